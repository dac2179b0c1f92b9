//! # ユースケース層
//!
//! ハンドラから呼ばれ、リポジトリ検索 → テンプレート → 送信を組み立てる。

pub mod notification;
pub mod tbm_notification;

pub use tbm_notification::{ApplicantNotificationInput, NotifyOutcome, TbmNotificationUseCaseImpl};
