//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービスの責務（shared に axum 依存を入れない）
//! - 形状は `{ "error": "..." }` のみ。エラーコードフィールドは持たない

use serde::{Deserialize, Serialize};

/// エラーレスポンス
///
/// HTTP ステータスコードと組み合わせて返す。
/// 呼び出し元は管理画面のフロントエンドであり、`error` をそのまま表示する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
