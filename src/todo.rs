//! Todo item model
//!
//! `TodoItem` is the only entity in the system. Its serialized form is the
//! camelCase JSON object kept (as part of an array) under the session
//! storage key. `TodoPatch` carries the partial updates accepted by edit.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A single task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Opaque unique identifier, assigned once at creation
    pub id: String,
    /// Short title
    pub title: String,
    /// Free-form description (may be empty)
    pub description: String,
    /// Completion flag, `false` at creation
    pub completed: bool,
    /// Creation instant, immutable after creation
    #[serde(with = "created_at")]
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Create a new, not yet completed item
    ///
    /// `created_at` is truncated to millisecond precision, which is the
    /// precision of the stored representation.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: created_at.trunc_subsecs(3),
        }
    }
}

/// Partial update for an existing item
///
/// Fields left as `None` are not touched. `id` and `created_at` are
/// immutable and therefore not part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the completion flag
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Check whether the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Apply the specified fields to `item`
    pub fn apply_to(self, item: &mut TodoItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }
}

/// Wire format for `createdAt`
///
/// Written as an ISO-8601 UTC string with milliseconds
/// (`2026-10-16T09:30:00.123Z`). Read back from either such a string or
/// a number of milliseconds since the Unix epoch.
pub(crate) mod created_at {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireInstant {
        Text(String),
        Millis(f64),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_iso_string(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match WireInstant::deserialize(deserializer)? {
            WireInstant::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| D::Error::custom(format!("invalid createdAt '{}': {}", text, e))),
            WireInstant::Millis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.trunc() as i64)
                    .ok_or_else(|| D::Error::custom(format!("createdAt {} is out of range", ms)))
            }
            WireInstant::Millis(ms) => {
                Err(D::Error::custom(format!("createdAt {} is not finite", ms)))
            }
        }
    }
}

/// Render an instant the way it is stored (`YYYY-MM-DDTHH:MM:SS.mmmZ`)
pub fn to_iso_string(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> TodoItem {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        TodoItem::new("1", "Test Todo", "Test Description", at)
    }

    #[test]
    fn test_new_item_is_not_completed() {
        let item = sample();
        assert!(!item.completed);
        assert_eq!(item.id, "1");
    }

    #[test]
    fn test_new_item_truncates_to_millis() {
        let at = Utc.timestamp_nanos(1_700_000_000_123_456_789);
        let item = TodoItem::new("x", "t", "d", at);
        assert_eq!(item.created_at.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_serialized_field_names_are_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.contains_key("created_at"));
        assert_eq!(obj["createdAt"], "2026-10-16T09:30:00.000Z");
        assert_eq!(obj["completed"], false);
    }

    #[test]
    fn test_created_at_accepts_epoch_millis() {
        let json = r#"{"id":"a","title":"t","description":"d","completed":true,"createdAt":1700000000000}"#;
        let item: TodoItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.created_at.timestamp_millis(), 1_700_000_000_000);
        assert!(item.completed);
    }

    #[test]
    fn test_created_at_accepts_offset_timestamps() {
        let json = r#"{"id":"a","title":"t","description":"d","completed":false,"createdAt":"2026-10-16T18:30:00+09:00"}"#;
        let item: TodoItem = serde_json::from_str(json).unwrap();
        assert_eq!(to_iso_string(&item.created_at), "2026-10-16T09:30:00.000Z");
    }

    #[test]
    fn test_created_at_rejects_non_instants() {
        for bad in [r#"true"#, r#"null"#, r#""yesterday""#, r#"{}"#] {
            let json = format!(
                r#"{{"id":"a","title":"t","description":"d","completed":false,"createdAt":{}}}"#,
                bad
            );
            assert!(serde_json::from_str::<TodoItem>(&json).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_patch_only_touches_specified_fields() {
        let mut item = sample();
        TodoPatch::new().title("Renamed").apply_to(&mut item);
        assert_eq!(item.title, "Renamed");
        assert_eq!(item.description, "Test Description");
        assert!(!item.completed);

        TodoPatch::new()
            .description("")
            .completed(true)
            .apply_to(&mut item);
        assert_eq!(item.title, "Renamed");
        assert_eq!(item.description, "");
        assert!(item.completed);
    }

    #[test]
    fn test_empty_patch() {
        assert!(TodoPatch::new().is_empty());
        assert!(!TodoPatch::new().completed(false).is_empty());
    }
}
