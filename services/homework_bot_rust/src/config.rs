use homework_core::clients::practicum::DEFAULT_ENDPOINT;
use homework_core::{BotError, BotResult};
use std::env;
use std::time::Duration;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";
const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILE: &str = "main.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub practicum_endpoint: String,

    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub telegram_api_base_url: String,

    /// Sleep between ticks
    pub retry_period: Duration,
    /// Per-request timeout for both the review API and Telegram
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. All missing credentials
    /// are named in one error.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let practicum_token = required(PRACTICUM_TOKEN);
        let telegram_token = required(TELEGRAM_TOKEN);
        let telegram_chat_id = required(TELEGRAM_CHAT_ID);

        let (practicum_token, telegram_token, telegram_chat_id) =
            match (practicum_token, telegram_token, telegram_chat_id) {
                (Some(p), Some(t), Some(c)) => (p, t, c),
                (p, t, c) => {
                    let missing: Vec<&str> = [
                        (PRACTICUM_TOKEN, p.is_none()),
                        (TELEGRAM_TOKEN, t.is_none()),
                        (TELEGRAM_CHAT_ID, c.is_none()),
                    ]
                    .into_iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(key, _)| key)
                    .collect();
                    return Err(BotError::Configuration(format!(
                        "missing required environment variables: {}",
                        missing.join(", ")
                    )));
                }
            };

        let practicum_endpoint = lookup("PRACTICUM_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let telegram_api_base_url = lookup("TELEGRAM_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE_URL.to_string());

        let retry_period_secs = parse_secs(&lookup, "RETRY_PERIOD_SECS", DEFAULT_RETRY_PERIOD_SECS)?;
        let http_timeout_secs = parse_secs(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self {
            practicum_token,
            practicum_endpoint,
            telegram_token,
            telegram_chat_id,
            telegram_api_base_url,
            retry_period: Duration::from_secs(retry_period_secs),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

/// Log file location. Read on its own because the logger has to exist before
/// credentials are validated.
pub fn log_file_from_env() -> String {
    log_file_from_lookup(|key| env::var(key).ok())
}

pub fn log_file_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> BotResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match lookup(key) {
        Some(raw) => raw,
        None => return Ok(default),
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(BotError::Configuration(format!(
            "Invalid {key}: {raw} (expected a positive integer of seconds)"
        ))),
        Ok(secs) => Ok(secs),
    }
}
