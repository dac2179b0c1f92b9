//! # JSON 上の ID 表現
//!
//! データストアやフロントエンドから届く ID は、テーブルによって
//! UUID 文字列だったり整数だったりする。どちらも文字列として受け取るための型。

use serde::{Deserialize, Serialize};

/// 文字列または整数の ID
///
/// ```
/// use tbm_notify_shared::RawId;
///
/// let text: RawId = serde_json::from_str(r#""9b1d-42""#).unwrap();
/// let number: RawId = serde_json::from_str("42").unwrap();
///
/// assert_eq!(text.into_string(), "9b1d-42");
/// assert_eq!(number.into_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Integer(i64),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Integer(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_負の整数も文字列化できる() {
        let id: RawId = serde_json::from_str("-1").unwrap();
        assert_eq!(id.into_string(), "-1");
    }

    #[test]
    fn test_真偽値はデシリアライズできない() {
        assert!(serde_json::from_str::<RawId>("true").is_err());
    }
}
