use async_trait::async_trait;

use crate::error::BotResult;
use crate::models::FetchResult;

pub mod practicum;

pub use practicum::PracticumClient;

/// Source of homework status updates.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch all submissions changed since `since_timestamp` (unix seconds).
    async fn fetch(&self, since_timestamp: i64) -> BotResult<FetchResult>;

    /// Source name for logging
    fn source_name(&self) -> &str;
}
