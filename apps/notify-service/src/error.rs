//! # Notify Service エラー定義
//!
//! Notify Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンス本文は常に `{ "error": "<message>" }`。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tbm_notify_domain::{DomainError, notification::NotificationError};
use tbm_notify_infra::InfraError;
use tbm_notify_shared::ErrorResponse;
use thiserror::Error;

/// Notify Service で発生するエラー
#[derive(Debug, Error)]
pub enum NotifyError {
    /// POST 以外のメソッド
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 必須項目の欠落や不正な値
    #[error("{0}")]
    Validation(String),

    /// 登録者アカウントが取得できない
    #[error("User pendaftar tidak ditemukan.")]
    ApplicantNotFound,

    /// データストアまたはメール配信の失敗
    #[error("{0}")]
    Upstream(String),

    /// 内部エラー（テンプレートの失敗など）
    #[error("{0}")]
    Internal(String),
}

impl NotifyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ApplicantNotFound | Self::Upstream(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<InfraError> for NotifyError {
    fn from(e: InfraError) -> Self {
        tracing::error!(error = %e, span_trace = %e.span_trace(), "データストアの呼び出しに失敗");
        Self::Upstream(e.message())
    }
}

impl From<NotificationError> for NotifyError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::SendFailed(message) => Self::Upstream(message),
            NotificationError::TemplateFailed(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<DomainError> for NotifyError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(message) => Self::Validation(message),
        }
    }
}

impl IntoResponse for NotifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "リクエストの処理に失敗");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
