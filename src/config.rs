use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default).
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    /// Maximum accepted size of a JSON-RPC request body.
    pub max_body_bytes: usize,
    /// Optional path to a knowledge records JSON file. If None, the bundled corpus is used.
    pub knowledge_path: Option<PathBuf>,
    /// Timezone used for naive date/time arguments and as the `current_time` default.
    pub default_timezone: Tz,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_secs: 5,
            max_body_bytes: 1024 * 1024,
            knowledge_path: None,
            default_timezone: Tz::UTC,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// `DEFAULT_TIMEZONE` must be an IANA name (e.g. `Europe/London`); an
    /// unknown name fails startup instead of surfacing on every tool call.
    pub fn from_env() -> anyhow::Result<Self> {
        let timezone_name = env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let default_timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid DEFAULT_TIMEZONE '{}': {}", timezone_name, e))?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_else(|_| "1048576".to_string())
                .parse()?,
            knowledge_path: env::var("KNOWLEDGE_PATH").ok().map(PathBuf::from),
            default_timezone,
            log_format: LogFormat::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_utc() {
        let config = Config::default();
        assert_eq!(config.default_timezone, Tz::UTC);
        assert_eq!(config.port, 8080);
        assert!(config.knowledge_path.is_none());
    }
}
