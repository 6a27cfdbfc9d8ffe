//! Formatting helper functions for the session shell
//!
//! This module contains the plain-text rendering of the todo list and of
//! notifications.

use crate::notification::Notification;
use crate::todo::{TodoItem, to_iso_string};

/// Apply keyword filtering (case-insensitive search in id, title, and description)
///
/// # Arguments
/// * `items` - Items to filter, in display order
/// * `keyword` - Keyword to search for (case-insensitive)
///
/// # Returns
/// The matching items, order preserved
pub fn apply_keyword_filter<'a>(items: &'a [TodoItem], keyword: &str) -> Vec<&'a TodoItem> {
    let keyword_lower = keyword.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.id.to_lowercase().contains(&keyword_lower)
                || item.title.to_lowercase().contains(&keyword_lower)
                || item.description.to_lowercase().contains(&keyword_lower)
        })
        .collect()
}

/// Format todo items into a display string
///
/// # Arguments
/// * `items` - Items to format, in display order
///
/// # Returns
/// Formatted string representation of the items
pub fn format_todos<'a>(items: impl IntoIterator<Item = &'a TodoItem>) -> String {
    let items: Vec<&TodoItem> = items.into_iter().collect();
    if items.is_empty() {
        return "No todos found".to_string();
    }

    let done = items.iter().filter(|item| item.completed).count();
    let mut result = format!("{} todo(s), {} completed:\n\n", items.len(), done);
    for item in items {
        let mark = if item.completed { "x" } else { " " };
        result.push_str(&format!("- [{}] {} ({})\n", mark, item.title, item.id));
        if !item.description.is_empty() {
            result.push_str(&format!("  {}\n", item.description));
        }
        result.push_str(&format!("  Created: {}\n", to_iso_string(&item.created_at)));
    }

    result
}

/// Format a notification as a single line
pub fn format_notification(notification: &Notification) -> String {
    format!(
        "[{}] {} (type 'ok' to dismiss, hides after {}s)",
        notification.severity,
        notification.message,
        notification.duration.as_secs()
    )
}
