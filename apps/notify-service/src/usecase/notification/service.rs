//! # 通知サービス
//!
//! テンプレートレンダリング → メール送信 → ビジネスイベントログを統合するサービス。
//!
//! ## 設計方針
//!
//! - **失敗は呼び出し元に返す**: 送信失敗はそのまま API のエラーレスポンスになる
//! - **1 通知 = 1 回の送信**: 宛先リスト全体を 1 回の `send_email` で送る
//! - **依存性注入**: `NotificationSender` は trait で抽象化

use std::sync::Arc;

use tbm_notify_domain::notification::{NotificationError, SenderIdentity, TbmNotification};
use tbm_notify_infra::notification::NotificationSender;
use tbm_notify_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};

use super::TemplateRenderer;

/// 通知サービス
pub struct NotificationService {
    sender:             Arc<dyn NotificationSender>,
    template_renderer:  TemplateRenderer,
    from:               SenderIdentity,
    dashboard_base_url: String,
}

impl NotificationService {
    pub fn new(
        sender: Arc<dyn NotificationSender>,
        template_renderer: TemplateRenderer,
        from: SenderIdentity,
        dashboard_base_url: String,
    ) -> Self {
        Self {
            sender,
            template_renderer,
            from,
            dashboard_base_url,
        }
    }

    /// 通知を送信する
    ///
    /// テンプレートレンダリング → メール送信を行い、結果をビジネスイベントとして記録する。
    pub async fn notify(&self, notification: &TbmNotification) -> Result<(), NotificationError> {
        let event_type: &str = notification.event_type().into();
        let recipients = notification.recipients();

        let email = self
            .template_renderer
            .render(notification, &self.from, &self.dashboard_base_url)
            .inspect_err(|e| {
                tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::TEMPLATE,
                    error = %e,
                    event_type,
                    "通知テンプレートのレンダリングに失敗"
                );
            })?;

        match self.sender.send_email(&email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::TBM,
                    event.result = event::result::SUCCESS,
                    notification.event_type = event_type,
                    notification.recipient_count = recipients.len(),
                    notification.recipients = %recipients.joined(),
                    notification.subject = %email.subject,
                    "通知メール送信成功"
                );
                Ok(())
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::TBM,
                    event.result = event::result::FAILURE,
                    notification.event_type = event_type,
                    notification.recipient_count = recipients.len(),
                    error.category = log_error::category::EXTERNAL_SERVICE,
                    error.kind = log_error::kind::MAIL_DISPATCH,
                    error = %e,
                    "通知メール送信失敗"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tbm_notify_domain::{notification::RegistrationSummary, region::Region};
    use tbm_notify_infra::mock::MockNotificationSender;

    use super::*;

    fn make_service(sender: MockNotificationSender) -> NotificationService {
        NotificationService::new(
            Arc::new(sender),
            TemplateRenderer::new().unwrap(),
            SenderIdentity {
                name:  "Forum TBM".to_string(),
                email: "asisten@weathrly.web.id".to_string(),
            },
            "http://localhost:3000".to_string(),
        )
    }

    fn make_notification() -> TbmNotification {
        TbmNotification::RegistrationSubmitted {
            registration: RegistrationSummary {
                nama_tbm:       "TBM Melati".to_string(),
                nama_pendaftar: Some("Siti Aminah".to_string()),
                kabupaten:      Some(Region::new("Bandung")),
                provinsi:       Some(Region::new("Jawa Barat")),
                email_tbm:      None,
            },
            kabupaten:    Region::new("Bandung"),
            recipients:   ["pd1@example.com", "pd2@example.com"].into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn 全宛先を1回の送信にまとめる() {
        let sender = MockNotificationSender::new();
        let service = make_service(sender.clone());

        service.notify(&make_notification()).await.unwrap();

        let sent = sender.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["pd1@example.com", "pd2@example.com"]);
        assert_eq!(sent[0].from.name, "Forum TBM");
        assert_eq!(sent[0].subject, "[Verifikasi] Pendaftaran Baru: TBM Melati");
    }

    #[tokio::test]
    async fn 送信失敗はエラーとして返す() {
        let sender = MockNotificationSender::new();
        sender.fail_with("Unauthorized");
        let service = make_service(sender.clone());

        let result = service.notify(&make_notification()).await;

        assert!(matches!(
            result,
            Err(NotificationError::SendFailed(message)) if message == "Unauthorized"
        ));
        assert_eq!(sender.call_count(), 1);
        assert!(sender.sent_emails().is_empty());
    }
}
