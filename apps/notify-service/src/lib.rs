//! # TBM Notify Service
//!
//! TBM 登録の審査フローに合わせて、役員と登録者にメールで通知するサービス。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 送信先 |
//! |----------|------|--------|
//! | GET | `/health` | - |
//! | POST | `/api/notify-pd` | 県・市の PD |
//! | POST | `/api/notify-pw` | 州の PW |
//! | POST | `/api/notify-pendaftar` | 登録者と TBM 連絡先 |
//!
//! ## レイヤー構成
//!
//! ```text
//! handler → usecase → infra (PostgREST / PostgreSQL, SendGrid / SMTP)
//!              ↓
//!           domain
//! ```

pub mod config;
pub mod error;
pub mod handler;
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
pub mod usecase;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use handler::{
    NotifyState,
    health_check,
    method_not_allowed,
    notify_pd,
    notify_pendaftar,
    notify_pw,
};
use tower_http::trace::TraceLayer;

/// ルーターを構築する
///
/// 通知エンドポイントは POST のみ。他のメソッドには JSON の 405 を返す。
pub fn router(state: Arc<NotifyState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/notify-pd",
            post(notify_pd).fallback(method_not_allowed),
        )
        .route(
            "/api/notify-pw",
            post(notify_pw).fallback(method_not_allowed),
        )
        .route(
            "/api/notify-pendaftar",
            post(notify_pendaftar).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
