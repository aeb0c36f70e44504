//! Error taxonomy shared by the fetcher, validator, translator and notifier.
//!
//! Only `Configuration` is fatal. Everything else is caught by the poll loop,
//! logged, and retried on the next tick.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("review API unavailable: {0}")]
    ServerUnavailable(String),

    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    #[error("unexpected homework status: {0}")]
    UnexpectedStatus(String),

    #[error("chat delivery failed: {0}")]
    DeliveryFailed(String),
}

pub type BotResult<T> = std::result::Result<T, BotError>;
