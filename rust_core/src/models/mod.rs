// Shared models for the homework bot
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Review API payload
// ============================================================================

/// One homework entry as reported by the review API.
///
/// Fields stay optional here: presence of the name and status is enforced by
/// the translator, not by deserialization. `id` and `status` are kept as raw
/// JSON so a wrongly typed value fails only its own record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(rename = "homework_name", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
}

impl SubmissionRecord {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            status: Some(Value::String(status.into())),
        }
    }
}

/// Validated result of a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub homeworks: Vec<SubmissionRecord>,
    pub current_date: i64,
}

// ============================================================================
// Review status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Reviewing,
    Approved,
    Rejected,
}

impl HomeworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "approved" => Ok(HomeworkStatus::Approved),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(other.to_string()),
        }
    }
}

// ============================================================================
// Poll loop state
// ============================================================================

/// State carried between ticks. Lives only as long as the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// `from_date` for the next fetch (unix seconds).
    pub last_timestamp: i64,
    /// Last verdict delivered to the chat, keyed by homework name.
    pub last_notified: HashMap<String, String>,
    /// Last failure message delivered to the chat.
    pub last_error_message: Option<String>,
}

impl PollState {
    pub fn starting_at(timestamp: i64) -> Self {
        Self {
            last_timestamp: timestamp,
            ..Self::default()
        }
    }

    pub fn prior_message(&self, name: Option<&str>) -> Option<&str> {
        name.and_then(|n| self.last_notified.get(n)).map(String::as_str)
    }

    /// Move the query window forward. Never moves it backwards.
    pub fn advance_to(&mut self, current_date: i64) {
        if current_date > self.last_timestamp {
            self.last_timestamp = current_date;
        }
    }
}
