//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは入力検証だけを行い、宛先検索と送信はユースケース層に委譲
//! - POST 以外は [`method_not_allowed`] が JSON で 405 を返す

pub mod health;
pub mod notify_pd;
pub mod notify_pendaftar;
pub mod notify_pw;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
pub use health::health_check;
pub use notify_pd::notify_pd;
pub use notify_pendaftar::notify_pendaftar;
pub use notify_pw::notify_pw;

use serde::Deserialize;
use tbm_notify_domain::{notification::RegistrationSummary, region::Region};

use crate::{error::NotifyError, usecase::TbmNotificationUseCaseImpl};

/// 通知ハンドラーの State
pub struct NotifyState {
    pub usecase: Arc<TbmNotificationUseCaseImpl>,
}

/// 登録内容の通知リクエスト（notify-pd / notify-pw 共通）
///
/// 必須項目の判定はハンドラごとに行うため、すべて `Option` で受ける。
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationRequest {
    pub nama_tbm:       Option<String>,
    pub nama_pendaftar: Option<String>,
    pub provinsi:       Option<String>,
    pub kabupaten:      Option<String>,
    pub email_tbm:      Option<String>,
}

impl RegistrationRequest {
    /// 通知本文に載せる登録内容に変換する
    pub(crate) fn into_summary(self, nama_tbm: String) -> RegistrationSummary {
        RegistrationSummary {
            nama_tbm,
            nama_pendaftar: self.nama_pendaftar,
            kabupaten: self.kabupaten.map(Region::new),
            provinsi: self.provinsi.map(Region::new),
            email_tbm: self.email_tbm,
        }
    }
}

/// POST 以外のメソッドへの応答
pub async fn method_not_allowed() -> NotifyError {
    NotifyError::MethodNotAllowed
}

/// JSON として読めない本文をバリデーションエラーにする
pub(crate) fn invalid_body(rejection: JsonRejection) -> NotifyError {
    NotifyError::Validation(format!("Body JSON tidak valid: {}", rejection.body_text()))
}

/// 前後の空白を除いて空でない値だけを残す
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
