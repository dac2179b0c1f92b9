//! # PostgREST クライアント
//!
//! Supabase の REST API（PostgREST）でテーブルを参照する薄いクライアント。
//!
//! ## 設計方針
//!
//! - **参照専用**: このサービスは SELECT しか行わないため `select` のみ提供する
//! - **service role key で認証**: RLS を越えて他ユーザーのプロファイルを参照する。
//!   `apikey` ヘッダと `Authorization: Bearer` の両方に同じキーを載せる
//! - **フィルタは PostgREST 記法**: `role=eq.PD`, `wilayah=ilike.Bandung` のように
//!   `列名=演算子.値` をクエリ文字列で渡す

use serde::de::DeserializeOwned;

use crate::error::InfraError;

/// PostgREST クライアント
#[derive(Clone)]
pub struct PostgrestClient {
    rest_url:    String,
    service_key: String,
    client:      reqwest::Client,
}

impl PostgrestClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `base_url`: Supabase プロジェクト URL（例: `https://xyz.supabase.co`）
    /// - `service_key`: service role key
    pub fn new(base_url: &str, service_key: impl Into<String>) -> Self {
        Self {
            rest_url:    format!("{}/rest/v1", base_url.trim_end_matches('/')),
            service_key: service_key.into(),
            client:      reqwest::Client::new(),
        }
    }

    /// SELECT リクエストを組み立てる
    ///
    /// `filters` は `(列名, "演算子.値")` の組。値は URL エンコードされる。
    pub(crate) fn build_select(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
        limit: Option<usize>,
    ) -> Result<reqwest::Request, InfraError> {
        let mut query: Vec<(&str, String)> = vec![("select", columns.to_string())];
        query.extend(filters.iter().cloned());
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let request = self
            .client
            .get(format!("{}/{}", self.rest_url, table))
            .query(&query)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .build()?;

        Ok(request)
    }

    /// テーブルから行を取得する
    ///
    /// 2xx 以外のステータスは [`InfraError::unexpected_status`] として返す。
    /// 本文には PostgREST のエラー JSON（`{"message": ...}`）が入る。
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
        limit: Option<usize>,
    ) -> Result<Vec<T>, InfraError> {
        let request = self.build_select(table, columns, filters, limit)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InfraError::unexpected_status(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// 完全一致フィルタ（`eq.値`）
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// 大文字小文字を無視した完全一致フィルタ（`ilike.値`）
///
/// `%` `_` `\` をエスケープし、パターンではなく値そのものと照合させる。
pub(crate) fn ilike_exact(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("ilike.{escaped}")
}
