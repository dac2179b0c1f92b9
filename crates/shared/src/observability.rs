//! # Observability 基盤
//!
//! `LOG_FORMAT=json` でデプロイ先のログ収集に流す JSON 出力に切り替える。

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// 不正な値は Pretty 扱い（subscriber 初期化前なので警告は stderr）
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => {
                eprintln!("WARNING: unknown LOG_FORMAT={s:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|val| Self::parse(&val))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// ルートスパンの `service` フィールド
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }
}

/// グローバル subscriber を登録し、`main` で enter しておくルートスパンを返す
///
/// `RUST_LOG` 未設定時は `info,tbm_notify=debug`。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) -> tracing::Span {
    use tracing_subscriber::util::SubscriberInitExt;

    build_subscriber(config.log_format).init();

    tracing::info_span!("app", service = %config.service_name)
}

/// `ErrorLayer` 込みの subscriber を組み立てる
#[cfg(feature = "observability")]
fn build_subscriber(log_format: LogFormat) -> impl tracing::Subscriber + Send + Sync + 'static {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tbm_notify=debug".into());

    let fmt_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== LogFormat::parse テスト =====

    #[test]
    fn test_parse_jsonでjsonを返す() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
    }

    #[test]
    fn test_parse_大文字や空白を含んでもjsonを返す() {
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    }

    #[test]
    fn test_parse_不正な値でprettyにフォールバックする() {
        assert_eq!(LogFormat::parse("unknown"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }

    #[test]
    fn test_newでフィールドが正しく設定される() {
        let config = TracingConfig::new("notify-service", LogFormat::Json);

        assert_eq!(config.service_name, "notify-service");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_subscriberはspan_traceにスパン経路を記録する() {
        let subscriber = build_subscriber(LogFormat::Json);

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("notify_district", kabupaten = "Bandung");
            let _enter = span.enter();

            let trace = tracing_error::SpanTrace::capture();
            assert!(
                trace.to_string().contains("notify_district"),
                "SpanTrace がスパン名を含むこと: {trace}",
            );
        });
    }
}
