//! # PostgreSQL データベース接続管理
//!
//! `DATA_BACKEND=postgres` のときに使う接続プールを作成する。
//!
//! Supabase の PostgreSQL に直接接続する場合、`DATABASE_URL` には
//! service role 相当の権限を持つユーザーを指定する（RLS を越えて
//! user_profiles を参照する必要があるため）。

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// PostgreSQL 接続プールを作成する
///
/// アプリケーション起動時に一度だけ呼び出し、作成したプールを
/// 各リポジトリで共有する。
///
/// # 設定値
///
/// - `max_connections(5)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト。超過時はエラー
///
/// # 例
///
/// ```rust,ignore
/// use tbm_notify_infra::db;
///
/// let pool = db::create_pool("postgres://localhost/postgres").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}
