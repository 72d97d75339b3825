use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const APP_DIR: &str = "matematik-pintar";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub data_dir: PathBuf,
    pub rust_log: String,
    pub retry: RetryPolicy,
}

impl Config {
    /// Read settings from the environment, loading `.env` first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_key = var("GEMINI_API_KEY").or_else(|| var("API_KEY"));
        let api_base = var("MATEMATIK_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let model = var("MATEMATIK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let data_dir = var("MATEMATIK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let rust_log = var("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(
            var("MATEMATIK_MAX_RETRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            var("MATEMATIK_RETRY_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_delay),
        );

        Self {
            api_key,
            api_base,
            model,
            data_dir,
            rust_log,
            retry,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
}
