//! Shape checks for the review API payload.
//!
//! Expected body:
//! `{"homeworks": [{"homework_name": "...", "status": "..."}], "current_date": 1700000000}`

use serde::Deserialize;
use serde_json::Value;

use crate::error::{BotError, BotResult};
use crate::models::{FetchResult, SubmissionRecord};

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Validate a decoded response body and convert it into a [`FetchResult`].
pub fn validate(raw: &Value) -> BotResult<FetchResult> {
    let body = raw.as_object().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type_name(raw)
        ))
    })?;

    let homeworks = body
        .get(HOMEWORKS_KEY)
        .ok_or_else(|| BotError::MalformedResponse(format!("missing key `{HOMEWORKS_KEY}`")))?;
    let current_date = body
        .get(CURRENT_DATE_KEY)
        .ok_or_else(|| BotError::MalformedResponse(format!("missing key `{CURRENT_DATE_KEY}`")))?;

    let homeworks = homeworks.as_array().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "`{HOMEWORKS_KEY}` must be an array, got {}",
            json_type_name(homeworks)
        ))
    })?;
    let current_date = current_date.as_i64().ok_or_else(|| {
        BotError::MalformedResponse(format!(
            "`{CURRENT_DATE_KEY}` must be an integer, got {}",
            json_type_name(current_date)
        ))
    })?;

    let homeworks = homeworks
        .iter()
        .enumerate()
        .map(|(idx, entry)| parse_record(idx, entry))
        .collect::<BotResult<Vec<_>>>()?;

    Ok(FetchResult {
        homeworks,
        current_date,
    })
}

fn parse_record(idx: usize, entry: &Value) -> BotResult<SubmissionRecord> {
    if !entry.is_object() {
        return Err(BotError::MalformedResponse(format!(
            "`{HOMEWORKS_KEY}[{idx}]` must be an object, got {}",
            json_type_name(entry)
        )));
    }
    SubmissionRecord::deserialize(entry)
        .map_err(|e| BotError::MalformedResponse(format!("`{HOMEWORKS_KEY}[{idx}]`: {e}")))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
