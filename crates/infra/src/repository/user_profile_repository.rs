//! # UserProfileRepository
//!
//! `user_profiles` テーブルから通知先の役員と登録者アカウントを取得する。
//!
//! ## 設計方針
//!
//! - **地域は大文字小文字無視で照合**: PostgREST では `ilike`、PostgreSQL では
//!   `lower()` 同士の比較。どちらも最終的に [`UserProfile::is_official_of`] と同じ判定になる
//! - **欠損カラムは空文字列**: email / username / wilayah が NULL の行も読み込み、
//!   空のアドレスは宛先構築時に除外する

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use tbm_notify_domain::{
    region::Region,
    user::{UserId, UserProfile, UserRole},
};
use tbm_notify_shared::RawId;

use crate::{
    error::InfraError,
    postgrest::{self, PostgrestClient},
};

const TABLE: &str = "user_profiles";
const COLUMNS: &str = "id,email,username,role,wilayah";

/// ユーザープロファイルリポジトリトレイト
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// 指定ロール・指定地域の役員を取得する
    ///
    /// 地域は大文字小文字を無視した完全一致で照合する。
    /// 該当者がいない場合は空の Vec を返す。
    async fn find_officials(
        &self,
        role: &UserRole,
        region: &Region,
    ) -> Result<Vec<UserProfile>, InfraError>;

    /// ID でプロファイルを検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(profile))`: 見つかった場合
    /// - `Ok(None)`: 見つからない場合
    /// - `Err(_)`: データストアエラー
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, InfraError>;
}

/// user_profiles の 1 行（PostgREST の JSON 表現）
#[derive(Debug, Deserialize)]
struct UserProfileRow {
    id:       RawId,
    email:    Option<String>,
    username: Option<String>,
    role:     Option<String>,
    wilayah:  Option<String>,
}

impl UserProfileRow {
    fn into_profile(self) -> Result<UserProfile, InfraError> {
        to_profile(
            self.id.into_string(),
            self.email,
            self.username,
            self.role,
            self.wilayah,
        )
    }
}

/// user_profiles の 1 行（PostgreSQL 直接接続）
#[derive(Debug, sqlx::FromRow)]
struct PgUserProfileRow {
    id:       String,
    email:    Option<String>,
    username: Option<String>,
    role:     Option<String>,
    wilayah:  Option<String>,
}

impl PgUserProfileRow {
    fn into_profile(self) -> Result<UserProfile, InfraError> {
        to_profile(self.id, self.email, self.username, self.role, self.wilayah)
    }
}

fn to_profile(
    id: String,
    email: Option<String>,
    username: Option<String>,
    role: Option<String>,
    wilayah: Option<String>,
) -> Result<UserProfile, InfraError> {
    let id = UserId::new(id).map_err(|e| InfraError::unexpected(e.to_string()))?;
    Ok(UserProfile::new(
        id,
        email.unwrap_or_default(),
        username.unwrap_or_default(),
        UserRole::from(role.unwrap_or_default()),
        Region::new(wilayah.unwrap_or_default()),
    ))
}

// ===== PostgREST 実装 =====

/// PostgREST（Supabase REST API）実装の UserProfileRepository
#[derive(Clone)]
pub struct PostgrestUserProfileRepository {
    client: PostgrestClient,
}

impl PostgrestUserProfileRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserProfileRepository for PostgrestUserProfileRepository {
    async fn find_officials(
        &self,
        role: &UserRole,
        region: &Region,
    ) -> Result<Vec<UserProfile>, InfraError> {
        let rows: Vec<UserProfileRow> = self
            .client
            .select(
                TABLE,
                COLUMNS,
                &[
                    ("role", postgrest::eq(role.as_str())),
                    ("wilayah", postgrest::ilike_exact(region.as_str())),
                ],
                None,
            )
            .await?;

        // ILIKE の照合結果を Region::matches で絞り直す
        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            let profile = row.into_profile()?;
            if profile.is_official_of(role, region) {
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, InfraError> {
        let rows: Vec<UserProfileRow> = self
            .client
            .select(TABLE, COLUMNS, &[("id", postgrest::eq(id.as_str()))], Some(1))
            .await?;

        rows.into_iter()
            .next()
            .map(UserProfileRow::into_profile)
            .transpose()
    }
}

// ===== PostgreSQL 実装 =====

/// PostgreSQL 実装の UserProfileRepository
#[derive(Debug, Clone)]
pub struct PostgresUserProfileRepository {
    pool: PgPool,
}

impl PostgresUserProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserProfileRepository for PostgresUserProfileRepository {
    async fn find_officials(
        &self,
        role: &UserRole,
        region: &Region,
    ) -> Result<Vec<UserProfile>, InfraError> {
        let rows = sqlx::query_as::<_, PgUserProfileRow>(
            r#"
            SELECT
                id::text AS id,
                email,
                username,
                role::text AS role,
                wilayah
            FROM user_profiles
            WHERE role::text = $1 AND lower(wilayah) = lower($2)
            "#,
        )
        .bind(role.as_str())
        .bind(region.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            let profile = row.into_profile()?;
            if profile.is_official_of(role, region) {
                profiles.push(profile);
            }
        }
        Ok(profiles)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, InfraError> {
        let row = sqlx::query_as::<_, PgUserProfileRow>(
            r#"
            SELECT
                id::text AS id,
                email,
                username,
                role::text AS role,
                wilayah
            FROM user_profiles
            WHERE id::text = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PgUserProfileRow::into_profile).transpose()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_postgrestの行を数値idのままプロファイルに変換できる() {
        let row: UserProfileRow = serde_json::from_value(serde_json::json!({
            "id": 12,
            "email": "pd@example.com",
            "username": "pd_bandung",
            "role": "PD",
            "wilayah": "Bandung"
        }))
        .unwrap();

        let profile = row.into_profile().unwrap();

        assert_eq!(profile.id().as_str(), "12");
        assert_eq!(profile.email(), "pd@example.com");
        assert_eq!(profile.role(), &UserRole::Pd);
        assert_eq!(profile.wilayah(), &Region::new("Bandung"));
    }

    #[test]
    fn test_nullのカラムは空文字列として読み込む() {
        let row: UserProfileRow = serde_json::from_value(serde_json::json!({
            "id": "u-1",
            "email": null,
            "username": null,
            "role": null,
            "wilayah": null
        }))
        .unwrap();

        let profile = row.into_profile().unwrap();

        assert_eq!(profile.email(), "");
        assert_eq!(profile.username(), "");
        assert_eq!(profile.role(), &UserRole::Other(String::new()));
    }

    #[test]
    fn test_空のidはエラーになる() {
        let result = to_profile(" ".to_string(), None, None, None, None);
        assert!(result.is_err());
    }
}
