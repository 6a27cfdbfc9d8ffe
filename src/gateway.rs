//! Persistence gateway between the in-memory todo list and session storage
//!
//! The list is kept as one JSON array under [`STORAGE_KEY`]. None of the
//! functions here return a hard error to the caller:
//! - [`load`] turns every read, parse or shape failure into an empty list,
//!   logs a warning, and discards corrupt data.
//! - [`save`] turns every write failure into a [`SaveError`] whose message is
//!   meant for the user.
//!
//! [`validate`] is a pure structural check and never touches storage.

use crate::storage::SessionStore;
use crate::todo::TodoItem;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Fixed key the list is stored under
pub const STORAGE_KEY: &str = "todos";

const PARSE_FAILURE: &str = "Failed to parse todos from session storage";
const INVALID_DATA: &str = "Invalid todos data in session storage, discarding";
const UNREADABLE_TIMESTAMP: &str = "Unreadable createdAt in session storage, discarding";
const CLEAR_FAILURE: &str = "Failed to clear corrupt todos from session storage";

/// Reason a save did not happen
///
/// The `Display` text is the user-facing notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SaveError {
    /// The session's storage allotment is exhausted
    #[error("Session storage is full. Your latest changes are kept in memory but were not saved.")]
    QuotaExceeded,
    /// Any other failure while serializing or writing
    #[error("Failed to save todos to session storage.")]
    Failed,
}

impl SaveError {
    /// Check whether this is a capacity failure
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, SaveError::QuotaExceeded)
    }
}

/// Check that `candidate` has the shape of a stored todo list
///
/// Accepts an array (possibly empty) whose elements are all objects with
/// string `id`, `title` and `description`, boolean `completed` and a present
/// `createdAt` of any type. Business rules such as non-empty titles or
/// unique ids are not checked here.
pub fn validate(candidate: &Value) -> bool {
    match candidate.as_array() {
        Some(items) => items.iter().all(is_stored_todo),
        None => false,
    }
}

fn is_stored_todo(value: &Value) -> bool {
    let Some(fields) = value.as_object() else {
        return false;
    };

    fields.get("id").is_some_and(Value::is_string)
        && fields.get("title").is_some_and(Value::is_string)
        && fields.get("description").is_some_and(Value::is_string)
        && fields.get("completed").is_some_and(Value::is_boolean)
        && fields.contains_key("createdAt")
}

/// Read the stored list
///
/// Returns an empty list when the key is absent or when anything goes wrong.
/// Unparseable or badly shaped data is removed from storage so it is not
/// read again. Element order is preserved.
pub fn load<S>(store: &mut S) -> Vec<TodoItem>
where
    S: SessionStore + ?Sized,
{
    let raw = match store.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            // Storage itself is unreachable, clearing would fail the same way
            warn!(error = %e, "{}", PARSE_FAILURE);
            return Vec::new();
        }
    };

    let candidate: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "{}", PARSE_FAILURE);
            clear(store);
            return Vec::new();
        }
    };

    if !validate(&candidate) {
        warn!("{}", INVALID_DATA);
        clear(store);
        return Vec::new();
    }

    match serde_json::from_value::<Vec<TodoItem>>(candidate) {
        Ok(items) => {
            debug!(count = items.len(), "loaded todos from session storage");
            items
        }
        Err(e) => {
            warn!(error = %e, "{}", UNREADABLE_TIMESTAMP);
            clear(store);
            Vec::new()
        }
    }
}

/// Write the whole list, replacing whatever was stored before
///
/// Either the complete list is written or nothing changes.
pub fn save<S>(store: &mut S, items: &[TodoItem]) -> Result<(), SaveError>
where
    S: SessionStore + ?Sized,
{
    let json = match serde_json::to_string(items) {
        Ok(json) => json,
        Err(e) => {
            error!(detail = %e, "{}", SaveError::Failed);
            return Err(SaveError::Failed);
        }
    };

    match store.set_item(STORAGE_KEY, &json) {
        Ok(()) => {
            debug!(count = items.len(), bytes = json.len(), "saved todos to session storage");
            Ok(())
        }
        Err(e) => {
            let reason = if e.is_quota_exceeded() {
                SaveError::QuotaExceeded
            } else {
                SaveError::Failed
            };
            error!(detail = %e, "{}", reason);
            Err(reason)
        }
    }
}

/// Remove the stored list, best effort
///
/// Returns whether the removal succeeded. A failure is logged, never raised.
pub fn clear<S>(store: &mut S) -> bool
where
    S: SessionStore + ?Sized,
{
    match store.remove_item(STORAGE_KEY) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "{}", CLEAR_FAILURE);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_element() -> Value {
        json!({
            "id": "1",
            "title": "Test Todo",
            "description": "Test Description",
            "completed": false,
            "createdAt": "2026-10-16T09:30:00.000Z"
        })
    }

    #[test]
    fn test_validate_accepts_empty_array() {
        assert!(validate(&json!([])));
    }

    #[test]
    fn test_validate_accepts_well_formed_list() {
        assert!(validate(&json!([valid_element(), valid_element()])));
    }

    #[test]
    fn test_validate_rejects_non_arrays() {
        for candidate in [
            Value::Null,
            json!(true),
            json!(42),
            json!("todos"),
            valid_element(),
        ] {
            assert!(!validate(&candidate), "{}", candidate);
        }
    }

    #[test]
    fn test_validate_rejects_non_object_elements() {
        assert!(!validate(&json!([valid_element(), 1])));
        assert!(!validate(&json!([null])));
        assert!(!validate(&json!([[valid_element()]])));
    }

    #[test]
    fn test_validate_rejects_wrong_field_types() {
        assert!(!validate(&json!([{"id": 1, "title": "Invalid"}])));

        for (field, bad) in [
            ("id", json!(1)),
            ("title", json!(null)),
            ("description", json!(["x"])),
            ("completed", json!("false")),
        ] {
            let mut element = valid_element();
            element[field] = bad;
            assert!(!validate(&json!([element])), "{}", field);
        }
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        for field in ["id", "title", "description", "completed", "createdAt"] {
            let mut element = valid_element();
            element.as_object_mut().unwrap().remove(field);
            assert!(!validate(&json!([element])), "{}", field);
        }
    }

    #[test]
    fn test_validate_only_requires_created_at_presence() {
        for created_at in [json!(null), json!(0), json!("not a date"), json!({})] {
            let mut element = valid_element();
            element["createdAt"] = created_at;
            assert!(validate(&json!([element])));
        }
    }

    #[test]
    fn test_validate_ignores_business_rules() {
        let mut element = valid_element();
        element["title"] = json!("");
        assert!(validate(&json!([element.clone(), element])));
    }

    #[test]
    fn test_save_error_messages_differ() {
        assert_ne!(
            SaveError::QuotaExceeded.to_string(),
            SaveError::Failed.to_string()
        );
        assert!(SaveError::QuotaExceeded.is_quota_exceeded());
        assert!(!SaveError::Failed.is_quota_exceeded());
    }
}
