use crate::{Error, Result};

/// How the binary renders log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Runtime settings loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the candle array to analyze.
    pub candles_path: String,
    /// Optional TOML file overriding the default analysis thresholds.
    pub analysis_config_path: Option<String>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let log_format = match optional_env("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "" | "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(Error::Config(format!(
                    "LOG_FORMAT must be 'pretty' or 'json', got: '{other}'"
                )))
            }
        };

        Ok(Config {
            candles_path: required_env("CANDLES_PATH")?,
            analysis_config_path: optional_env("ANALYSIS_CONFIG_PATH"),
            log_format,
        })
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        Error::Config(format!(
            "Required environment variable '{key}' is not set. Check your .env file."
        ))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
