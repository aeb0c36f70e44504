//! Status -> verdict translation with content-based dedup.

use serde_json::Value;

use crate::error::{BotError, BotResult};
use crate::models::{HomeworkStatus, SubmissionRecord};

/// Fixed verdict table keyed by review status.
pub fn verdict(status: HomeworkStatus) -> &'static str {
    match status {
        HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
        HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
        HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// A new message that should be delivered.
    Notification(String),
    /// Rendered message matches what was already sent.
    NoChange,
}

/// Render the chat message for a record, or `NoChange` when it equals
/// `prior_message`.
pub fn translate(record: &SubmissionRecord, prior_message: Option<&str>) -> BotResult<Translation> {
    let name = record
        .name
        .as_deref()
        .ok_or_else(|| BotError::MalformedResponse("homework entry has no `homework_name`".to_string()))?;

    let status = match &record.status {
        Some(Value::String(raw)) => raw
            .parse::<HomeworkStatus>()
            .map_err(|unknown| BotError::UnexpectedStatus(format!("`{unknown}` for homework \"{name}\"")))?,
        Some(other) => {
            return Err(BotError::UnexpectedStatus(format!(
                "non-string status `{other}` for homework \"{name}\""
            )))
        }
        None => {
            return Err(BotError::UnexpectedStatus(format!(
                "missing status for homework \"{name}\""
            )))
        }
    };

    let message = render_message(name, status);
    if prior_message == Some(message.as_str()) {
        return Ok(Translation::NoChange);
    }
    Ok(Translation::Notification(message))
}

pub fn render_message(name: &str, status: HomeworkStatus) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        verdict(status)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_table() {
        assert_eq!(
            verdict(HomeworkStatus::Approved),
            "Работа проверена: ревьюеру всё понравилось. Ура!"
        );
        assert_eq!(
            verdict(HomeworkStatus::Reviewing),
            "Работа взята на проверку ревьюером."
        );
        assert_eq!(
            verdict(HomeworkStatus::Rejected),
            "Работа проверена: у ревьюера есть замечания."
        );
    }

    #[test]
    fn test_translate_known_statuses() {
        for status in [
            HomeworkStatus::Reviewing,
            HomeworkStatus::Approved,
            HomeworkStatus::Rejected,
        ] {
            let record = SubmissionRecord::new("hw1", status.as_str());
            let expected = format!(
                "Изменился статус проверки работы \"hw1\". {}",
                verdict(status)
            );
            assert_eq!(
                translate(&record, None).unwrap(),
                Translation::Notification(expected)
            );
        }
    }

    #[test]
    fn test_unknown_status() {
        let record = SubmissionRecord::new("hw1", "lost");
        let err = translate(&record, None).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedStatus(ref m) if m.contains("lost")));
    }

    #[test]
    fn test_missing_status_is_unexpected() {
        let record = SubmissionRecord {
            id: None,
            name: Some("hw1".to_string()),
            status: None,
        };
        assert!(matches!(
            translate(&record, None),
            Err(BotError::UnexpectedStatus(_))
        ));
    }

    #[test]
    fn test_non_string_status_is_unexpected() {
        for status in [serde_json::json!(3), serde_json::json!(null), serde_json::json!(["approved"])] {
            let record = SubmissionRecord {
                id: None,
                name: Some("hw1".to_string()),
                status: Some(status),
            };
            assert!(matches!(
                translate(&record, None),
                Err(BotError::UnexpectedStatus(ref m)) if m.contains("non-string")
            ));
        }
    }

    #[test]
    fn test_missing_name_is_error() {
        let record = SubmissionRecord {
            id: Some(serde_json::json!(3)),
            name: None,
            status: Some(serde_json::json!("approved")),
        };
        assert!(matches!(
            translate(&record, None),
            Err(BotError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_repeated_message_is_no_change() {
        let record = SubmissionRecord::new("hw1", "approved");
        let Translation::Notification(first) = translate(&record, None).unwrap() else {
            panic!("expected a notification");
        };

        assert_eq!(translate(&record, Some(first.as_str())).unwrap(), Translation::NoChange);
    }

    #[test]
    fn test_status_change_is_notified() {
        let prior = render_message("hw1", HomeworkStatus::Reviewing);
        let record = SubmissionRecord::new("hw1", "approved");

        match translate(&record, Some(prior.as_str())).unwrap() {
            Translation::Notification(text) => assert!(text.contains("Ура!")),
            Translation::NoChange => panic!("status change must be notified"),
        }
    }

    #[test]
    fn test_dedup_is_by_content_not_id() {
        let mut first = SubmissionRecord::new("hw1", "rejected");
        first.id = Some(serde_json::json!(1));
        let mut second = first.clone();
        second.id = Some(serde_json::json!(2));

        let Translation::Notification(sent) = translate(&first, None).unwrap() else {
            panic!("expected a notification");
        };
        assert_eq!(translate(&second, Some(sent.as_str())).unwrap(), Translation::NoChange);
    }
}
