//! # テスト用アプリケーション
//!
//! インメモリのモックで組み立てたルーターと、リクエスト送信ヘルパー。

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use tbm_notify_domain::{
    notification::SenderIdentity,
    region::Region,
    tbm::{TbmId, TbmRecord},
    user::{UserId, UserProfile, UserRole},
};
use tbm_notify_infra::mock::{MockNotificationSender, MockTbmRepository, MockUserProfileRepository};
use tower::ServiceExt;

use crate::{
    handler::NotifyState,
    router,
    usecase::{
        TbmNotificationUseCaseImpl,
        notification::{NotificationService, TemplateRenderer},
    },
};

/// モックで組み立てたアプリケーション
///
/// モックは `Arc` 共有のため、ルーター構築後もデータの追加や失敗の注入ができる。
pub struct TestApp {
    pub router:   Router,
    pub profiles: MockUserProfileRepository,
    pub records:  MockTbmRepository,
    pub sender:   MockNotificationSender,
}

impl TestApp {
    pub fn new() -> Self {
        let profiles = MockUserProfileRepository::new();
        let records = MockTbmRepository::new();
        let sender = MockNotificationSender::new();

        let notifier = NotificationService::new(
            Arc::new(sender.clone()),
            TemplateRenderer::new().expect("テンプレートの読み込みに失敗"),
            SenderIdentity {
                name:  "Forum TBM".to_string(),
                email: "asisten@weathrly.web.id".to_string(),
            },
            "http://localhost:3000".to_string(),
        );
        let usecase = TbmNotificationUseCaseImpl::new(
            Arc::new(profiles.clone()),
            Arc::new(records.clone()),
            notifier,
        );
        let state = Arc::new(NotifyState {
            usecase: Arc::new(usecase),
        });

        Self {
            router: router(state),
            profiles,
            records,
            sender,
        }
    }

    pub fn add_profile(&self, id: &str, email: &str, role: UserRole, wilayah: &str) {
        self.profiles.add_profile(UserProfile::new(
            UserId::new(id).expect("空でない ID"),
            email,
            id,
            role,
            Region::new(wilayah),
        ));
    }

    pub fn add_tbm_record(
        &self,
        id: &str,
        tbm_email: Option<&str>,
        nama_pendaftar: Option<&str>,
        kabupaten_nama: Option<&str>,
    ) {
        self.records.add_record(TbmRecord {
            id:             TbmId::new(id).expect("空でない ID"),
            tbm_email:      tbm_email.map(String::from),
            nama_pendaftar: nama_pendaftar.map(String::from),
            kabupaten_nama: kabupaten_nama.map(Region::new),
            provinsi:       None,
        });
    }

    /// JSON 本文付きで POST し、ステータスと JSON 本文を返す
    pub async fn post_json(
        &self,
        uri: &str,
        payload: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("リクエストの構築に失敗");
        self.send(request).await
    }

    /// 任意のリクエストを送り、ステータスと JSON 本文を返す
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("ルーターの呼び出しに失敗");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("本文の読み込みに失敗");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
