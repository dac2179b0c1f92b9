/// 文字列ベースの ID 型を定義する宣言型マクロ
///
/// データストア側の主キーは UUID の場合も連番の場合もあるため、
/// 中身は文字列のまま保持する。
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`String` をラップ）
/// - `derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `new()`: 前後の空白を除去し、空文字列を拒否する
/// - `as_str()`: 内部文字列への参照
///
/// # 使用例
///
/// ```rust
/// use tbm_notify_domain::tbm::TbmId;
///
/// let id = TbmId::new(" 42 ").unwrap();
/// assert_eq!(id.as_str(), "42");
/// assert!(TbmId::new("").is_err());
/// ```
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
        label = $label:expr;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into().trim().to_string();
                if value.is_empty() {
                    return Err($crate::DomainError::Validation(format!(
                        "{}は必須です",
                        $label
                    )));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}
