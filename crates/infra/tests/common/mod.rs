//! テスト共通ヘルパー
//!
//! 外部 HTTP API の代わりに立てるスタブサーバー。 Rust の統合テスト規約に従い
//! `tests/common/mod.rs` に配置。

#![allow(dead_code)]

use axum::Router;
use tokio::net::TcpListener;

/// ルーターをローカルのランダムポートで起動し、ベース URL を返す
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("スタブサーバーのポート確保に失敗");
    let addr = listener.local_addr().expect("アドレス取得に失敗");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("スタブサーバーの起動に失敗");
    });

    format!("http://{addr}")
}
