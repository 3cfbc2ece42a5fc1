//! Configuration loading from files and environment variables.

use config::{Config, Environment, File};

use crate::error::{ServiceError, ServiceResult};

use super::AppConfig;

/// Load configuration from an optional `config` file and `CRICKET__*` env vars
///
/// For example `CRICKET__UPSTREAM__BASE_URL` and `CRICKET__UPSTREAM__API_KEY`.
pub fn load_config() -> ServiceResult<AppConfig> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(environment())
        .build()
        .map_err(|e| ServiceError::Config {
            message: format!("Failed to build config: {}", e),
        })?;

    parse_config(config)
}

/// `CRICKET__*` variables, left as strings
///
/// Numeric fields are converted during deserialization, so values such as
/// API keys keep their exact text (leading zeros included).
fn environment() -> Environment {
    Environment::with_prefix("CRICKET").separator("__")
}

/// Deserialize an already-built config source
pub fn parse_config(config: Config) -> ServiceResult<AppConfig> {
    config.try_deserialize().map_err(|e| ServiceError::Config {
        message: format!("Failed to deserialize config: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence_over_defaults() {
        let config = Config::builder()
            .set_override("upstream.base_url", "http://127.0.0.1:9999")
            .unwrap()
            .set_override("upstream.api_key", "rotated")
            .unwrap()
            .set_override("client.reply_delay_ms", 250)
            .unwrap()
            .build()
            .unwrap();

        let app = parse_config(config).unwrap();
        assert_eq!(app.upstream.base_url, "http://127.0.0.1:9999");
        assert_eq!(app.upstream.api_key, "rotated");
        assert_eq!(app.upstream.request_timeout_secs, 30);
        assert_eq!(app.client.reply_delay_ms, 250);
        assert_eq!(app.server.host, "0.0.0.0");
    }

    fn from_env(vars: &[(&str, &str)]) -> AppConfig {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap();
        parse_config(config).unwrap()
    }

    #[test]
    fn test_env_api_key_keeps_its_exact_text() {
        let app = from_env(&[
            ("CRICKET__UPSTREAM__API_KEY", "0012345"),
            ("CRICKET__UPSTREAM__BASE_URL", "http://10.0.0.1:8000"),
        ]);
        assert_eq!(app.upstream.api_key, "0012345");
        assert_eq!(app.upstream.base_url, "http://10.0.0.1:8000");

        let app = from_env(&[("CRICKET__UPSTREAM__API_KEY", "123e45")]);
        assert_eq!(app.upstream.api_key, "123e45");
    }

    #[test]
    fn test_env_numbers_still_parse() {
        let app = from_env(&[
            ("CRICKET__SERVER__PORT", "8080"),
            ("CRICKET__CLIENT__REPLY_DELAY_MS", "250"),
            ("CRICKET__UPSTREAM__REQUEST_TIMEOUT_SECS", "10"),
        ]);
        assert_eq!(app.server.port, 8080);
        assert_eq!(app.client.reply_delay_ms, 250);
        assert_eq!(app.upstream.request_timeout_secs, 10);
    }

    #[test]
    fn test_empty_source_yields_defaults() {
        let config = Config::builder().build().unwrap();
        let app = parse_config(config).unwrap();
        assert!(app.upstream.uses_default_api_key());
        assert_eq!(app.client.proxy_url, "http://127.0.0.1:3000");
    }
}
