//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 送信先 |
//! |---|------------|------|
//! | [`TbmNotification::RegistrationSubmitted`] | 新規登録（PD 検証待ち） | 該当県・市の PD 全員 |
//! | [`TbmNotification::DistrictVerified`] | PD 検証完了（PW 最終承認待ち） | 該当州の PW 全員 |
//! | [`TbmNotification::VerificationDecided`] | PD 審査結果 | 登録者アカウント + TBM 連絡先 |
//!
//! ## 設計方針
//!
//! - **enum による通知イベント**: 各バリアントが 1 つの通知エンドポイントに対応
//! - **一括送信**: 1 通知 = 1 メッセージ。宛先ごとの差し込みは行わない
//! - **テンプレート分離**: 通知イベントとメール生成は分離（TemplateRenderer は notify-service）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{region::Region, tbm::VerificationDecision};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知イベント種別
///
/// ログの `notification.event_type` フィールドに出力される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEventType {
    RegistrationSubmitted,
    DistrictVerified,
    RegistrationApproved,
    RegistrationRejected,
}

/// 送信元
///
/// 全通知で共通の固定値。呼び出しごとに変更はできない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub name:  String,
    pub email: String,
}

/// 宛先リスト
///
/// 追加順を保持し、同一アドレス（大文字小文字を区別した完全一致）の重複を除く。
/// 空文字列のアドレスは追加しない。
///
/// ```rust
/// use tbm_notify_domain::notification::Recipients;
///
/// let mut recipients = Recipients::new();
/// recipients.push("a@x.com");
/// recipients.push("a@x.com");
/// recipients.push("b@x.com");
/// assert_eq!(recipients.as_slice(), ["a@x.com", "b@x.com"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipients(Vec<String>);

impl Recipients {
    pub fn new() -> Self {
        Self::default()
    }

    /// アドレスを追加する。追加された場合は `true` を返す
    pub fn push(&mut self, email: impl Into<String>) -> bool {
        let email = email.into();
        if email.is_empty() || self.0.contains(&email) {
            return false;
        }
        self.0.push(email);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `"a@x.com, b@x.com"` 形式で連結する
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Recipients {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut recipients = Self::new();
        for email in iter {
            recipients.push(email);
        }
        recipients
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス（1 件以上）
    pub to:        Vec<String>,
    /// 送信元
    pub from:      SenderIdentity,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 通知メールに記載する登録内容
///
/// 登録フォームの入力値をそのまま持つ。未入力の項目は `None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub nama_tbm:       String,
    pub nama_pendaftar: Option<String>,
    pub kabupaten:      Option<Region>,
    pub provinsi:       Option<Region>,
    pub email_tbm:      Option<String>,
}

/// TBM 通知イベント
#[derive(Debug, Clone)]
pub enum TbmNotification {
    /// 新規登録: PD に検証を依頼する
    RegistrationSubmitted {
        registration: RegistrationSummary,
        /// 宛先の県・市（挨拶文に使用）
        kabupaten:    Region,
        recipients:   Recipients,
    },
    /// PD 検証完了: PW に最終承認を依頼する
    DistrictVerified {
        registration: RegistrationSummary,
        /// 宛先の州（挨拶文に使用）
        provinsi:     Region,
        recipients:   Recipients,
    },
    /// PD 審査結果: 登録者に承認・却下を知らせる
    VerificationDecided {
        decision:         VerificationDecision,
        nama_tbm:         String,
        /// 登録者アカウントのユーザー名
        account_username: String,
        /// 登録フォーム上の登録者名（取得できなければ `None`）
        nama_pendaftar:   Option<String>,
        /// 審査した PD の県・市名（取得できなければ `None`）
        district:         Option<Region>,
        /// 却下理由
        catatan:          Option<String>,
        recipients:       Recipients,
    },
}

impl TbmNotification {
    /// 通知イベント種別を返す
    pub fn event_type(&self) -> NotificationEventType {
        match self {
            Self::RegistrationSubmitted { .. } => NotificationEventType::RegistrationSubmitted,
            Self::DistrictVerified { .. } => NotificationEventType::DistrictVerified,
            Self::VerificationDecided { decision, .. } => match decision {
                VerificationDecision::Approved => NotificationEventType::RegistrationApproved,
                VerificationDecision::Rejected => NotificationEventType::RegistrationRejected,
            },
        }
    }

    /// 宛先リストを返す
    pub fn recipients(&self) -> &Recipients {
        match self {
            Self::RegistrationSubmitted { recipients, .. }
            | Self::DistrictVerified { recipients, .. }
            | Self::VerificationDecided { recipients, .. } => recipients,
        }
    }

    /// TBM 名を返す
    pub fn tbm_name(&self) -> &str {
        match self {
            Self::RegistrationSubmitted { registration, .. }
            | Self::DistrictVerified { registration, .. } => &registration.nama_tbm,
            Self::VerificationDecided { nama_tbm, .. } => nama_tbm,
        }
    }

    /// 審査した PD の署名名（`"Pengurus Daerah {district}"`）
    ///
    /// 県・市名が取得できない場合も接頭辞だけは出力する。
    pub fn signer_name(district: Option<&Region>) -> String {
        format!(
            "Pengurus Daerah {}",
            district.map(Region::as_str).unwrap_or_default()
        )
    }
}
