//! SendGridNotificationSender 統合テスト
//!
//! SendGrid の代わりにローカルのスタブサーバーへ送信し、
//! 失敗時に呼び出し元へ返るメッセージを確認する。

mod common;

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use common::spawn_stub;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tbm_notify_domain::notification::{EmailMessage, NotificationError, SenderIdentity};
use tbm_notify_infra::notification::{NotificationSender, SendGridNotificationSender};

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

#[tokio::test]
async fn test_受理されれば1回の呼び出しで全宛先に送る() {
    let received: Arc<Mutex<Vec<Value>>> = Arc::default();
    let router = Router::new()
        .route(
            "/v3/mail/send",
            post(
                |State(received): State<Arc<Mutex<Vec<Value>>>>,
                 headers: HeaderMap,
                 Json(body): Json<Value>| async move {
                    assert_eq!(headers["authorization"], "Bearer SG.test");
                    received.lock().unwrap().push(body);
                    StatusCode::ACCEPTED
                },
            ),
        )
        .with_state(received.clone());
    let base_url = spawn_stub(router).await;
    let sender = SendGridNotificationSender::with_endpoint(
        "SG.test",
        format!("{base_url}/v3/mail/send"),
    );

    sender.send_email(&make_email()).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["personalizations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_401はerrorsのメッセージをそのまま返す() {
    let router = Router::new().route(
        "/v3/mail/send",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "errors": [{
                        "message": "The provided authorization grant is invalid, expired, or revoked",
                        "field": null,
                        "help": null
                    }]
                })),
            )
                .into_response()
        }),
    );
    let base_url = spawn_stub(router).await;
    let sender = SendGridNotificationSender::with_endpoint(
        "SG.bad",
        format!("{base_url}/v3/mail/send"),
    );

    let err = sender.send_email(&make_email()).await.unwrap_err();

    assert!(matches!(
        err,
        NotificationError::SendFailed(ref message)
            if message == "The provided authorization grant is invalid, expired, or revoked"
    ));
}

#[tokio::test]
async fn test_本文のない失敗はステータスの理由句を返す() {
    let router = Router::new().route(
        "/v3/mail/send",
        post(|| async { StatusCode::FORBIDDEN }),
    );
    let base_url = spawn_stub(router).await;
    let sender = SendGridNotificationSender::with_endpoint(
        "SG.test",
        format!("{base_url}/v3/mail/send"),
    );

    let err = sender.send_email(&make_email()).await.unwrap_err();

    assert!(matches!(err, NotificationError::SendFailed(ref message) if message == "Forbidden"));
}
