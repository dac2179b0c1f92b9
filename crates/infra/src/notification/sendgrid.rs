//! SendGrid 通知送信実装
//!
//! SendGrid v3 Mail Send API（`POST /v3/mail/send`）でメールを送信する。
//!
//! 宛先ごとに personalization を分けるため、受信者には自分のアドレスだけが見える。
//! API 呼び出しは 1 通知につき 1 回。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tbm_notify_domain::notification::{EmailMessage, NotificationError};

use super::NotificationSender;

const DEFAULT_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// SendGrid 通知送信
#[derive(Clone)]
pub struct SendGridNotificationSender {
    client:   reqwest::Client,
    api_key:  String,
    endpoint: String,
}

impl SendGridNotificationSender {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// 送信先エンドポイントを指定して作成する（モックサーバー向け）
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            api_key:  api_key.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from:             Address<'a>,
    subject:          &'a str,
    content:          [Content<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name:  Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    value:        &'a str,
}

/// Mail Send API のエラー本文（`{"errors": [{"message": ...}]}`）
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    message: Option<String>,
}

/// 失敗レスポンスから呼び出し元に返すメッセージを決める
///
/// `errors[0].message` があればそれを、なければステータスの理由句を使う。
fn failure_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().find_map(|item| item.message))
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("status {}", status.as_u16()))
}

/// Mail Send API のリクエスト本文を組み立てる
///
/// `content` は text/plain → text/html の順（API の要件）。
fn build_payload(email: &EmailMessage) -> MailSendRequest<'_> {
    MailSendRequest {
        personalizations: email
            .to
            .iter()
            .map(|to| Personalization {
                to: [Address {
                    email: to,
                    name:  None,
                }],
            })
            .collect(),
        from:             Address {
            email: &email.from.email,
            name:  Some(email.from.name.as_str()),
        },
        subject:          &email.subject,
        content:          [
            Content {
                content_type: "text/plain",
                value:        &email.text_body,
            },
            Content {
                content_type: "text/html",
                value:        &email.html_body,
            },
        ],
    }
}

#[async_trait]
impl NotificationSender for SendGridNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&build_payload(email))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %self.endpoint, "SendGrid への接続に失敗");
                NotificationError::SendFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "SendGrid が送信を拒否");
            return Err(NotificationError::SendFailed(failure_message(status, &body)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tbm_notify_domain::notification::SenderIdentity;

    use super::*;

    fn make_email() -> EmailMessage {
        EmailMessage {
            to:        vec!["pd1@example.com".to_string(), "pd2@example.com".to_string()],
            from:      SenderIdentity {
                name:  "Forum TBM".to_string(),
                email: "asisten@weathrly.web.id".to_string(),
            },
            subject:   "[Verifikasi] Pendaftaran Baru: TBM Melati".to_string(),
            html_body: "<p>Halo</p>".to_string(),
            text_body: "Halo".to_string(),
        }
    }

    #[test]
    fn test_build_payloadは宛先ごとにpersonalizationを分ける() {
        let email = make_email();

        let payload = serde_json::to_value(build_payload(&email)).unwrap();

        assert_eq!(
            payload["personalizations"],
            serde_json::json!([
                { "to": [{ "email": "pd1@example.com" }] },
                { "to": [{ "email": "pd2@example.com" }] }
            ])
        );
    }

    #[test]
    fn test_build_payloadは送信元と本文を載せる() {
        let email = make_email();

        let payload = serde_json::to_value(build_payload(&email)).unwrap();

        assert_eq!(
            payload["from"],
            serde_json::json!({ "email": "asisten@weathrly.web.id", "name": "Forum TBM" })
        );
        assert_eq!(payload["subject"], "[Verifikasi] Pendaftaran Baru: TBM Melati");
        assert_eq!(
            payload["content"],
            serde_json::json!([
                { "type": "text/plain", "value": "Halo" },
                { "type": "text/html", "value": "<p>Halo</p>" }
            ])
        );
    }

    #[test]
    fn test_failure_messageはerrorsの先頭メッセージを返す() {
        let body = r#"{"errors":[{"message":"The provided authorization grant is invalid, expired, or revoked","field":null,"help":null}]}"#;

        assert_eq!(
            failure_message(reqwest::StatusCode::UNAUTHORIZED, body),
            "The provided authorization grant is invalid, expired, or revoked"
        );
    }

    #[test]
    fn test_failure_messageは本文がなければ理由句を返す() {
        assert_eq!(
            failure_message(reqwest::StatusCode::UNAUTHORIZED, ""),
            "Unauthorized"
        );
        assert_eq!(
            failure_message(reqwest::StatusCode::BAD_REQUEST, "<html>oops</html>"),
            "Bad Request"
        );
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SendGridNotificationSender>();
    }
}
