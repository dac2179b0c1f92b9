//! # TBM Notify ドメイン層
//!
//! 通知処理の中核となるドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! notify-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（データストア、メール配信）に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`region`] - 大文字小文字を区別しない地域名
//! - [`user`] - ユーザープロファイルとロール（PD / PW）
//! - [`tbm`] - TBM 登録レコードと審査結果
//! - [`notification`] - 通知イベント、宛先リスト、メールメッセージ

#[macro_use]
mod macros;

pub mod error;
pub mod notification;
pub mod region;
pub mod tbm;
pub mod user;

pub use error::DomainError;
