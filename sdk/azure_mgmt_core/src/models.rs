//! Common types shared across all Resource Manager crates.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::enums::CreatedByType;

/// Resource tags.
pub type Tags = HashMap<String, String>;

/// Metadata about the creation and last modification of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_type: Option<CreatedByType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by_type: Option<CreatedByType>,
}

impl SystemData {
    pub fn created_at_as_time(&self) -> Option<DateTime<FixedOffset>> {
        parse_time(self.created_at.as_deref())
    }

    pub fn set_created_at_as_time(&mut self, value: DateTime<FixedOffset>) {
        self.created_at = Some(format_time(&value));
    }

    pub fn last_modified_at_as_time(&self) -> Option<DateTime<FixedOffset>> {
        parse_time(self.last_modified_at.as_deref())
    }

    pub fn set_last_modified_at_as_time(&mut self, value: DateTime<FixedOffset>) {
        self.last_modified_at = Some(format_time(&value));
    }
}

/// Parse an RFC 3339 timestamp as sent by ARM. Returns `None` for absent or
/// malformed values.
pub fn parse_time(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|v| DateTime::parse_from_rfc3339(v).ok())
}

/// Format a timestamp the way ARM expects it.
pub fn format_time(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// The ARM error envelope: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error details reported by ARM, either in an error response or in the
/// body of a failed long-running operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_data_deserialization() {
        let json = serde_json::json!({
            "createdAt": "2024-01-02T03:04:05Z",
            "createdBy": "someone@example.com",
            "createdByType": "User",
            "lastModifiedByType": "Robot"
        });
        let data: SystemData = serde_json::from_value(json).unwrap();

        assert_eq!(data.created_by.as_deref(), Some("someone@example.com"));
        assert_eq!(data.created_by_type, Some(CreatedByType::User));
        assert_eq!(
            data.last_modified_by_type,
            Some(CreatedByType::Other("Robot".into()))
        );
        let created = data.created_at_as_time().expect("should parse");
        assert_eq!(created.timestamp(), 1704164645);
    }

    #[test]
    fn time_setter_round_trips() {
        let mut data = SystemData::default();
        let time = DateTime::parse_from_rfc3339("2023-06-01T12:30:00+00:00").unwrap();
        data.set_last_modified_at_as_time(time);

        assert_eq!(data.last_modified_at.as_deref(), Some("2023-06-01T12:30:00Z"));
        assert_eq!(data.last_modified_at_as_time(), Some(time));
    }

    #[test]
    fn malformed_time_is_none() {
        assert!(parse_time(Some("yesterday")).is_none());
        assert!(parse_time(None).is_none());
    }

    #[test]
    fn error_detail_deserialization() {
        let json = r#"{"error": {"code": "Conflict", "message": "busy", "details": [{"code": "Inner"}]}}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.code.as_deref(), Some("Conflict"));
        assert_eq!(response.error.details[0].code.as_deref(), Some("Inner"));
    }
}
