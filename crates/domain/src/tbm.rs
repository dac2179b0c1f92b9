//! # TBM（Taman Bacaan Masyarakat）登録
//!
//! `tbm` テーブルの登録レコードと、登録者に通知する審査結果を定義する。
//!
//! ## 審査の流れ
//!
//! ```text
//! 登録 ──→ PD 検証 ──→ 3_DISETUJUI ──→ PW 最終承認 ──→ SK / 会員証発行
//!              └──→ 4_DITOLAK
//! ```
//!
//! ステータスの遷移自体は別システムが行う。このサービスは遷移後に通知するだけ。

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::{DomainError, region::Region};

define_string_id! {
    /// TBM 登録 ID
    ///
    /// tbm テーブルの主キー。
    pub struct TbmId;
    label = "TBM ID";
}

/// TBM 登録レコード
///
/// 通知に必要な列のみ持つ。いずれの列も未入力の可能性がある。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TbmRecord {
    pub id:             TbmId,
    /// TBM の連絡先メールアドレス
    pub tbm_email:      Option<String>,
    /// 登録フォームに記入された登録者名
    pub nama_pendaftar: Option<String>,
    /// 県・市名
    pub kabupaten_nama: Option<Region>,
    /// 州名
    pub provinsi:       Option<Region>,
}

impl TbmRecord {
    /// 空でない連絡先メールアドレスを返す
    pub fn contact_email(&self) -> Option<&str> {
        self.tbm_email.as_deref().filter(|email| !email.is_empty())
    }
}

/// PD による審査結果
///
/// 登録者への通知対象となるステータス値のみを列挙する。
/// それ以外のステータスで通知を要求された場合はバリデーションエラーとする。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    strum::Display,
)]
pub enum VerificationDecision {
    /// PD が承認し、PW の最終承認待ちになった
    #[strum(serialize = "3_DISETUJUI")]
    #[serde(rename = "3_DISETUJUI")]
    Approved,
    /// PD が却下した
    #[strum(serialize = "4_DITOLAK")]
    #[serde(rename = "4_DITOLAK")]
    Rejected,
}

impl VerificationDecision {
    /// ステータス文字列をパースする
    ///
    /// 完全一致のみ受け付ける。
    pub fn parse(status: &str) -> Result<Self, DomainError> {
        status.parse().map_err(|_| {
            DomainError::Validation(format!("Status tidak valid untuk notifikasi: {status}"))
        })
    }
}
