//! # Notify Service サーバー
//!
//! 設定に応じてデータストアとメール送信バックエンドを選び、HTTP サーバーを起動する。
//!
//! ## 起動方法
//!
//! ```bash
//! DATA_BACKEND=postgrest \
//! SUPABASE_URL=https://xyz.supabase.co \
//! SUPABASE_SERVICE_ROLE_KEY=... \
//! NOTIFICATION_BACKEND=smtp \
//! cargo run -p tbm-notify-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tbm_notify_infra::{
    NoopNotificationSender,
    NotificationSender,
    SendGridNotificationSender,
    SmtpNotificationSender,
    db,
    postgrest::PostgrestClient,
    repository::{
        PostgresTbmRepository,
        PostgresUserProfileRepository,
        PostgrestTbmRepository,
        PostgrestUserProfileRepository,
        TbmRepository,
        UserProfileRepository,
    },
};
use tbm_notify_service::{
    config::{DataBackendConfig, MailBackendConfig, NotifyConfig},
    handler::NotifyState,
    router,
    usecase::{
        TbmNotificationUseCaseImpl,
        notification::{NotificationService, TemplateRenderer},
    },
};
use tbm_notify_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Notify Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let _tracing_guard = init_tracing(TracingConfig::from_env("notify-service")).entered();

    // 設定読み込み
    let config = NotifyConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Notify Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // データストア
    let (user_profiles, tbm_records): (Arc<dyn UserProfileRepository>, Arc<dyn TbmRepository>) =
        match &config.data {
            DataBackendConfig::Postgrest {
                url,
                service_role_key,
            } => {
                let client = PostgrestClient::new(url, service_role_key.clone());
                tracing::info!("PostgREST 経由でデータを参照します: {}", url);
                (
                    Arc::new(PostgrestUserProfileRepository::new(client.clone())),
                    Arc::new(PostgrestTbmRepository::new(client)),
                )
            }
            DataBackendConfig::Postgres { database_url } => {
                let pool = db::create_pool(database_url)
                    .await
                    .context("データベース接続に失敗しました")?;
                tracing::info!("データベースに接続しました");
                (
                    Arc::new(PostgresUserProfileRepository::new(pool.clone())),
                    Arc::new(PostgresTbmRepository::new(pool)),
                )
            }
        };

    // メール送信
    let sender: Arc<dyn NotificationSender> = match &config.notification.backend {
        MailBackendConfig::SendGrid { api_key } => {
            tracing::info!("SendGrid でメールを送信します");
            Arc::new(SendGridNotificationSender::new(api_key.clone()))
        }
        MailBackendConfig::Smtp { host, port } => {
            tracing::info!("SMTP でメールを送信します: {}:{}", host, port);
            Arc::new(SmtpNotificationSender::new(host, *port))
        }
        MailBackendConfig::Noop => {
            tracing::warn!("NOTIFICATION_BACKEND=noop のためメールは送信されません");
            Arc::new(NoopNotificationSender)
        }
    };

    // 依存コンポーネントを初期化
    let renderer = TemplateRenderer::new().context("テンプレートの読み込みに失敗しました")?;
    let notifier = NotificationService::new(
        sender,
        renderer,
        config.notification.from.clone(),
        config.notification.dashboard_base_url.clone(),
    );
    let usecase = TbmNotificationUseCaseImpl::new(user_profiles, tbm_records, notifier);
    let state = Arc::new(NotifyState {
        usecase: Arc::new(usecase),
    });

    let app = router(state);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Notify Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
