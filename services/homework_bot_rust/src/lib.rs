//! Homework Bot Service Library
//!
//! Exposes the poll loop, notifier and configuration for the binary and for
//! integration tests.

pub mod config;
pub mod logging;
pub mod poller;
pub mod telegram_client;

pub use config::Config;
pub use poller::{failure_message, HomeworkPoller, TickOutcome, TickSummary};
pub use telegram_client::{Notifier, TelegramClient};
