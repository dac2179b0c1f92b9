//! # 地域（wilayah）
//!
//! 県・市（kabupaten/kota）や州（provinsi）の名前を表す値オブジェクト。
//!
//! ## 設計方針
//!
//! - **自由記述のまま保持**: user_profiles.wilayah は自由入力であり、
//!   発音区別符号・空白・略称の正規化は行わない
//! - **大文字小文字を区別しない一致**: 照合は [`Region::matches`] に集約する
//!   （データストアの `ILIKE` と同じ判定）

use serde::{Deserialize, Serialize};

/// 地域名
///
/// # 使用例
///
/// ```rust
/// use tbm_notify_domain::region::Region;
///
/// let bandung = Region::new("Bandung");
/// assert!(bandung.matches(&Region::new("BANDUNG")));
/// assert!(!bandung.matches(&Region::new("Bandung Barat")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 大文字小文字を無視して同じ地域かを判定する
    ///
    /// 比較は Unicode の小文字化で行う。空白の除去はしない。
    pub fn matches(&self, other: &Region) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Bandung", "Bandung")]
    #[case("bandung", "Bandung")]
    #[case("KOTA BANDUNG", "Kota Bandung")]
    #[case("jawa barat", "Jawa Barat")]
    fn test_大文字小文字だけが異なる地域は一致する(#[case] a: &str, #[case] b: &str) {
        assert!(Region::new(a).matches(&Region::new(b)));
    }

    #[rstest]
    #[case("Bandung", "Bandung Barat")]
    #[case("Bandung", " Bandung")]
    #[case("Kab. Bandung", "Kabupaten Bandung")]
    #[case("Bandung", "")]
    fn test_正規化が必要な差異は一致しない(#[case] a: &str, #[case] b: &str) {
        assert!(!Region::new(a).matches(&Region::new(b)));
    }

    #[test]
    fn test_displayは元の表記をそのまま出力する() {
        assert_eq!(Region::new("Jawa Barat").to_string(), "Jawa Barat");
    }
}
