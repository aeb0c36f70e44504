//! Homework Core - review API access and verdict logic for the homework bot.
//!
//! This module provides:
//! - Review API client with HTTP outcome classification
//! - Payload shape validation
//! - Status to verdict translation with content-based dedup
//! - Shared error taxonomy

pub mod clients;
pub mod error;
pub mod models;
pub mod validation;
pub mod verdicts;

pub use clients::{HomeworkSource, PracticumClient};
pub use error::{BotError, BotResult};
pub use models::{FetchResult, HomeworkStatus, PollState, SubmissionRecord};
pub use validation::validate;
pub use verdicts::{translate, Translation};
