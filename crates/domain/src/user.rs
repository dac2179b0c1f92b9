//! # ユーザープロファイル
//!
//! `user_profiles` テーブルの 1 行を表すモデル。
//! このサービスは参照のみ行い、作成・更新はしない。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`UserRole::Pd`] | Pengurus Daerah | 県・市レベルの役員。新規登録を最初に検証する |
//! | [`UserRole::Pw`] | Pengurus Wilayah | 州レベルの役員。最終承認と SK 発行を行う |
//! | [`UserRole::Pp`] | Pengurus Pusat | 中央役員 |

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::region::Region;

define_string_id! {
    /// ユーザー ID
    ///
    /// user_profiles テーブルの主キー。
    pub struct UserId;
    label = "ユーザー ID";
}

/// ユーザーロール
///
/// データストア上は `role` カラムの文字列（`"PD"`, `"PW"` など）。
/// 未知の値は [`UserRole::Other`] として保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum UserRole {
    /// Pengurus Daerah（県・市役員）
    Pd,
    /// Pengurus Wilayah（州役員）
    Pw,
    /// Pengurus Pusat（中央役員）
    Pp,
    /// 上記以外（一般の登録者など）
    Other(String),
}

impl UserRole {
    /// データストア上の表記
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pd => "PD",
            Self::Pw => "PW",
            Self::Pp => "PP",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for UserRole {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PD" => Self::Pd,
            "PW" => Self::Pw,
            "PP" => Self::Pp,
            _ => Self::Other(value),
        }
    }
}

impl FromStr for UserRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ユーザープロファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id:       UserId,
    email:    String,
    username: String,
    role:     UserRole,
    wilayah:  Region,
}

impl UserProfile {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        username: impl Into<String>,
        role: UserRole,
        wilayah: Region,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            role,
            wilayah,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> &UserRole {
        &self.role
    }

    pub fn wilayah(&self) -> &Region {
        &self.wilayah
    }

    /// 指定ロールかつ指定地域（大文字小文字無視）の役員かを判定する
    pub fn is_official_of(&self, role: &UserRole, region: &Region) -> bool {
        &self.role == role && self.wilayah.matches(region)
    }
}
