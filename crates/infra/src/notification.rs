//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **3 つの実装**: SendGrid（本番用）、SMTP（Mailpit 開発用）、Noop（テスト用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択
//! - **1 通知 = 1 回の送信**: 複数の宛先は 1 回の呼び出しでまとめて送る

mod noop;
mod sendgrid;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopNotificationSender;
pub use sendgrid::SendGridNotificationSender;
pub use smtp::SmtpNotificationSender;
use tbm_notify_domain::notification::{EmailMessage, NotificationError};

/// メール送信トレイト
///
/// 通知基盤の中核。メール送信の具体的な方法を抽象化する。
/// SendGrid / SMTP / Noop の 3 実装を環境変数で切り替える。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    ///
    /// `email.to` の全宛先に同じ件名・本文を送る。
    /// 失敗時のメッセージはそのまま API のエラーレスポンスに載る。
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}
