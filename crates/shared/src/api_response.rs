//! # 通知 API レスポンス
//!
//! 通知エンドポイントの成功レスポンス形式を提供する。
//!
//! 2 つの形状がある:
//!
//! - 送信した場合: `{ "success": true, "message": "..." }`
//! - 宛先が 0 件で送信をスキップした場合: `{ "message": "..." }`

use serde::{Deserialize, Serialize};

/// 通知 API の成功レスポンス
///
/// ## 使用例
///
/// ```
/// use tbm_notify_shared::MessageResponse;
///
/// let response = MessageResponse::sent("Notifikasi dikirim ke 2 pengurus daerah.");
/// assert_eq!(response.success, Some(true));
///
/// let skipped = MessageResponse::skipped("tidak ada PD");
/// assert_eq!(skipped.success, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// 送信した場合のみ `true`。スキップ時はフィールド自体を出力しない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub message: String,
}

impl MessageResponse {
    /// メールを送信した場合のレスポンス
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            message: message.into(),
        }
    }

    /// 宛先が見つからず送信しなかった場合のレスポンス
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sentはsuccess_trueを含むjsonになる() {
        let response = MessageResponse::sent("terkirim");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "success": true, "message": "terkirim" })
        );
    }

    #[test]
    fn test_skippedはsuccessフィールドを出力しない() {
        let response = MessageResponse::skipped("dilewati");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "message": "dilewati" }));
    }

    #[test]
    fn test_successなしのjsonをデシリアライズできる() {
        let response: MessageResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();

        assert_eq!(response, MessageResponse::skipped("ok"));
    }
}
