//! # Notify Service 設定
//!
//! 環境変数から Notify Service の設定を読み込む。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `NOTIFY_HOST` | `0.0.0.0` | バインドアドレス |
//! | `NOTIFY_PORT` | `3000` | ポート番号 |
//! | `DATA_BACKEND` | `postgrest` | `postgrest` / `postgres` |
//! | `SUPABASE_URL` | - | PostgREST のベース URL（postgrest 時は必須） |
//! | `SUPABASE_SERVICE_ROLE_KEY` | - | service role key（postgrest 時は必須） |
//! | `DATABASE_URL` | - | PostgreSQL 接続 URL（postgres 時は必須） |
//! | `NOTIFICATION_BACKEND` | `noop` | `sendgrid` / `smtp` / `noop` |
//! | `SENDGRID_API_KEY` | - | sendgrid 時は必須 |
//! | `SMTP_HOST` / `SMTP_PORT` | `localhost` / `1025` | smtp 時に使用 |
//! | `NOTIFICATION_FROM_NAME` | `Forum TBM` | 送信元の表示名 |
//! | `NOTIFICATION_FROM_ADDRESS` | `asisten@weathrly.web.id` | 送信元アドレス |
//! | `DASHBOARD_BASE_URL` | `http://localhost:3000` | メール内ボタンのリンク先 |

use std::env;

use tbm_notify_domain::notification::SenderIdentity;
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Notify Service の設定
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// データストア設定
    pub data:         DataBackendConfig,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// データストアの接続先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataBackendConfig {
    /// Supabase の REST API（PostgREST）
    Postgrest {
        url:              String,
        service_role_key: String,
    },
    /// PostgreSQL 直接接続
    Postgres { database_url: String },
}

/// メール送信バックエンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBackendConfig {
    SendGrid { api_key: String },
    Smtp { host: String, port: u16 },
    Noop,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub backend:            MailBackendConfig,
    /// 送信元
    pub from:               SenderIdentity,
    /// ダッシュボードのベース URL（メール内リンク用）
    pub dashboard_base_url: String,
}

impl NotifyConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の変数ソースから設定を読み込む
    ///
    /// 空文字列の値は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let port = match var("NOTIFY_PORT") {
            Some(value) => parse_port("NOTIFY_PORT", value)?,
            None => 3000,
        };

        let data = match var("DATA_BACKEND").as_deref().unwrap_or("postgrest") {
            "postgrest" => DataBackendConfig::Postgrest {
                url:              required("SUPABASE_URL")?,
                service_role_key: required("SUPABASE_SERVICE_ROLE_KEY")?,
            },
            "postgres" => DataBackendConfig::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name:  "DATA_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let backend = match var("NOTIFICATION_BACKEND").as_deref().unwrap_or("noop") {
            "sendgrid" => MailBackendConfig::SendGrid {
                api_key: required("SENDGRID_API_KEY")?,
            },
            "smtp" => MailBackendConfig::Smtp {
                host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: match var("SMTP_PORT") {
                    Some(value) => parse_port("SMTP_PORT", value)?,
                    None => 1025,
                },
            },
            "noop" => MailBackendConfig::Noop,
            other => {
                return Err(ConfigError::Invalid {
                    name:  "NOTIFICATION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: var("NOTIFY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            data,
            notification: NotificationConfig {
                backend,
                from: SenderIdentity {
                    name:  var("NOTIFICATION_FROM_NAME").unwrap_or_else(|| "Forum TBM".to_string()),
                    email: var("NOTIFICATION_FROM_ADDRESS")
                        .unwrap_or_else(|| "asisten@weathrly.web.id".to_string()),
                },
                dashboard_base_url: var("DASHBOARD_BASE_URL")
                    .unwrap_or_else(|| "http://localhost:3000".to_string()),
            },
        })
    }
}

fn parse_port(name: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
