//! The transient record written by the memory round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record stored, read back and deleted by the memory check.
///
/// `user` is omitted from the JSON when no user identifier is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub test: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ProbeRecord {
    pub const fn new(user: Option<String>) -> Self {
        Self { test: true, user }
    }

    /// Whether a retrieved JSON value matches this record.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        serde_json::from_value::<Self>(value.clone()).is_ok_and(|r| &r == self)
    }
}

/// Key used for the memory round trip: `test-<unix millis>`.
pub fn probe_key(now: DateTime<Utc>) -> String {
    format!("test-{}", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_key_uses_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(probe_key(now), "test-1700000000123");
    }

    #[test]
    fn test_record_serialization() {
        let record = ProbeRecord::new(Some("alice".to_string()));
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"test": true, "user": "alice"})
        );

        // No user: field dropped entirely
        let anon = ProbeRecord::new(None);
        assert_eq!(serde_json::to_value(&anon).unwrap(), json!({"test": true}));

        // Empty identifier is still an identifier
        let empty = ProbeRecord::new(Some(String::new()));
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({"test": true, "user": ""})
        );
    }

    #[test]
    fn test_record_matches() {
        let record = ProbeRecord::new(Some("alice".to_string()));
        assert!(record.matches(&json!({"test": true, "user": "alice"})));
        assert!(!record.matches(&json!({"test": true, "user": "bob"})));
        assert!(!record.matches(&json!("not a record")));
    }
}
