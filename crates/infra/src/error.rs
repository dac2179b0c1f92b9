//! # インフラ層エラー定義
//!
//! データストアや外部サービスとの通信で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Database, Http 等）
//!
//! `From` 実装や convenience constructor でエラーを生成すると、
//! その時点のスパン情報が自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
/// `Display` は種別付きのメッセージを出力する（ログ向け）。
/// API レスポンスには [`InfraError::message`] を使う。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// データベースエラー（`DATA_BACKEND=postgres`）
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// HTTP 通信エラー（PostgREST / SendGrid への接続失敗など）
    #[error("HTTP 通信エラー: {0}")]
    Http(#[source] reqwest::Error),

    /// シリアライズ/デシリアライズエラー
    #[error("シリアライズエラー: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 外部 API が成功以外のステータスを返した
    ///
    /// `body` にはレスポンス本文（PostgREST のエラー JSON など）をそのまま入れる。
    #[error("外部 API エラー (status={status}): {body}")]
    UnexpectedStatus {
        status: u16,
        body:   String,
    },

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 失敗元が返したメッセージをそのまま取り出す
    ///
    /// - PostgREST のエラー本文は JSON の `message` を優先し、なければ本文全体
    /// - データベースエラーはサーバーが返したメッセージ
    /// - それ以外は元のエラーの `Display`
    pub fn message(&self) -> String {
        match &self.kind {
            InfraErrorKind::Database(sqlx::Error::Database(db)) => db.message().to_string(),
            InfraErrorKind::Database(e) => e.to_string(),
            InfraErrorKind::Http(e) => e.to_string(),
            InfraErrorKind::Serialization(e) => e.to_string(),
            InfraErrorKind::UnexpectedStatus { status, body } => {
                upstream_message(body).unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        format!("status {status}")
                    } else {
                        body.clone()
                    }
                })
            }
            InfraErrorKind::Unexpected(message) => message.clone(),
        }
    }

    /// 外部 API の異常ステータスエラーを生成する
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::UnexpectedStatus {
                status,
                body: body.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

/// エラー本文 `{"message": "..."}` から `message` を取り出す
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(source: reqwest::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Http(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(source: serde_json::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Serialization(source),
            span_trace: SpanTrace::capture(),
        }
    }
}
