//! # TBM Notify インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データストア参照**: Supabase の PostgREST 経由、または PostgreSQL 直接接続で
//!   user_profiles / tbm を読む
//! - **リポジトリ実装**: ユースケース層が使うリポジトリトレイトと具体実装
//! - **メール送信**: SendGrid / SMTP / Noop の送信実装
//!
//! ## 依存関係
//!
//! ```text
//! notify-service → infra → domain
//!                    ↘
//!                    shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL 接続プール
//! - [`postgrest`] - PostgREST クライアント
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - [`notification`] - メール送信
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use tbm_notify_infra::{
//!     postgrest::PostgrestClient,
//!     repository::{PostgrestUserProfileRepository, UserProfileRepository},
//! };
//!
//! let client = PostgrestClient::new("https://xyz.supabase.co", service_role_key);
//! let profiles = PostgrestUserProfileRepository::new(client);
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;
pub mod postgrest;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
pub use notification::{
    NoopNotificationSender,
    NotificationSender,
    SendGridNotificationSender,
    SmtpNotificationSender,
};
