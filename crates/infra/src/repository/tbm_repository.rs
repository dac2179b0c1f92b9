//! # TbmRepository
//!
//! `tbm` テーブルから通知本文に載せる登録情報を取得する。

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use tbm_notify_domain::{
    region::Region,
    tbm::{TbmId, TbmRecord},
};
use tbm_notify_shared::RawId;

use crate::{
    error::InfraError,
    postgrest::{self, PostgrestClient},
};

const TABLE: &str = "tbm";
const COLUMNS: &str = "id,tbm_email,nama_pendaftar,kabupaten_nama,provinsi";

/// TBM 登録リポジトリトレイト
#[async_trait]
pub trait TbmRepository: Send + Sync {
    /// ID で登録レコードを検索
    async fn find_by_id(&self, id: &TbmId) -> Result<Option<TbmRecord>, InfraError>;
}

#[derive(Debug, Deserialize)]
struct TbmRow {
    id:             RawId,
    tbm_email:      Option<String>,
    nama_pendaftar: Option<String>,
    kabupaten_nama: Option<String>,
    provinsi:       Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct PgTbmRow {
    id:             String,
    tbm_email:      Option<String>,
    nama_pendaftar: Option<String>,
    kabupaten_nama: Option<String>,
    provinsi:       Option<String>,
}

fn to_record(
    id: String,
    tbm_email: Option<String>,
    nama_pendaftar: Option<String>,
    kabupaten_nama: Option<String>,
    provinsi: Option<String>,
) -> Result<TbmRecord, InfraError> {
    Ok(TbmRecord {
        id: TbmId::new(id).map_err(|e| InfraError::unexpected(e.to_string()))?,
        tbm_email,
        nama_pendaftar,
        kabupaten_nama: kabupaten_nama.map(Region::new),
        provinsi: provinsi.map(Region::new),
    })
}

impl TbmRow {
    fn into_record(self) -> Result<TbmRecord, InfraError> {
        to_record(
            self.id.into_string(),
            self.tbm_email,
            self.nama_pendaftar,
            self.kabupaten_nama,
            self.provinsi,
        )
    }
}

impl PgTbmRow {
    fn into_record(self) -> Result<TbmRecord, InfraError> {
        to_record(
            self.id,
            self.tbm_email,
            self.nama_pendaftar,
            self.kabupaten_nama,
            self.provinsi,
        )
    }
}

/// PostgREST 実装の TbmRepository
#[derive(Clone)]
pub struct PostgrestTbmRepository {
    client: PostgrestClient,
}

impl PostgrestTbmRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TbmRepository for PostgrestTbmRepository {
    async fn find_by_id(&self, id: &TbmId) -> Result<Option<TbmRecord>, InfraError> {
        let rows: Vec<TbmRow> = self
            .client
            .select(TABLE, COLUMNS, &[("id", postgrest::eq(id.as_str()))], Some(1))
            .await?;

        rows.into_iter().next().map(TbmRow::into_record).transpose()
    }
}

/// PostgreSQL 実装の TbmRepository
#[derive(Debug, Clone)]
pub struct PostgresTbmRepository {
    pool: PgPool,
}

impl PostgresTbmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TbmRepository for PostgresTbmRepository {
    async fn find_by_id(&self, id: &TbmId) -> Result<Option<TbmRecord>, InfraError> {
        let row = sqlx::query_as::<_, PgTbmRow>(
            r#"
            SELECT
                id::text AS id,
                tbm_email,
                nama_pendaftar,
                kabupaten_nama,
                provinsi
            FROM tbm
            WHERE id::text = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PgTbmRow::into_record).transpose()
    }
}
