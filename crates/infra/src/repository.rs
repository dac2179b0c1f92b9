//! # リポジトリ実装
//!
//! 通知の宛先と本文データを取得するリポジトリ。
//!
//! ## 設計方針
//!
//! - **参照専用**: すべてのメソッドは読み取りのみ
//! - **2 つのバックエンド**: Supabase の PostgREST 経由と PostgreSQL 直接接続。
//!   `DATA_BACKEND` で切り替え、ユースケース層はトレイトだけを見る
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod tbm_repository;
pub mod user_profile_repository;

pub use tbm_repository::{PostgresTbmRepository, PostgrestTbmRepository, TbmRepository};
pub use user_profile_repository::{
    PostgresUserProfileRepository,
    PostgrestUserProfileRepository,
    UserProfileRepository,
};
