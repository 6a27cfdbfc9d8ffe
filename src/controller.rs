//! List controller
//!
//! `TodoList` owns the authoritative, insertion-ordered list of items for the
//! lifetime of the session and keeps session storage in sync with it. Every
//! mutation is applied in memory first; saving is a side effect that runs
//! only once the list has been initialized from storage. A failed save never
//! rolls back the in-memory change, it leaves a [`PendingNotice`] for the UI.

use crate::gateway::{self, SaveError};
use crate::ids::IdGenerator;
use crate::notification::{Notification, Severity};
use crate::storage::SessionStore;
use crate::todo::{TodoItem, TodoPatch};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

/// Initialization state of a [`TodoList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Storage has not been read yet, mutations are not persisted
    Uninitialized,
    /// Storage has been read once, every mutation is persisted
    Initialized,
}

/// Result of an operation addressed to an item id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The item was found and changed
    Applied,
    /// No item has this id, nothing changed
    NotFound,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

/// A save failure waiting to be acknowledged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotice {
    /// Increases with every failure, so a stale dismissal can be told apart
    pub id: u64,
    pub error: SaveError,
}

impl PendingNotice {
    /// User-facing message
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Build the transient notification shown for this failure
    pub fn to_notification(&self, duration: Duration) -> Notification {
        Notification::new(self.message(), Severity::Error, duration)
    }
}

/// The todo list aggregate
pub struct TodoList<S, G> {
    store: S,
    ids: G,
    items: Vec<TodoItem>,
    phase: Phase,
    notice: Option<PendingNotice>,
    shown_notice: Option<u64>,
    notice_counter: u64,
}

impl<S, G> TodoList<S, G>
where
    S: SessionStore,
    G: IdGenerator,
{
    /// Create an empty, uninitialized list over `store`
    pub fn new(store: S, ids: G) -> Self {
        Self {
            store,
            ids,
            items: Vec::new(),
            phase: Phase::Uninitialized,
            notice: None,
            shown_notice: None,
            notice_counter: 0,
        }
    }

    /// Load the stored list and start persisting
    ///
    /// The loaded list replaces the in-memory one, then it is saved once.
    /// Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.phase == Phase::Initialized {
            debug!("todo list already initialized");
            return;
        }

        self.items = gateway::load(&mut self.store);
        self.phase = Phase::Initialized;
        debug!(count = self.items.len(), "todo list initialized");
        self.persist();
    }

    /// Append a new item created now
    pub fn add(&mut self, title: impl Into<String>, description: impl Into<String>) -> &TodoItem {
        self.add_at(title, description, Utc::now())
    }

    /// Append a new item with an explicit creation instant
    pub fn add_at(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> &TodoItem {
        let id = self.fresh_id();
        let index = self.items.len();
        self.items.push(TodoItem::new(id, title, description, created_at));
        self.persist();
        &self.items[index]
    }

    /// Replace the fields set in `patch` on the item with `id`
    ///
    /// Unknown ids are a silent no-op; the list is still saved.
    pub fn edit(&mut self, id: &str, patch: TodoPatch) -> Outcome {
        let outcome = match self.find_mut(id) {
            Some(item) => {
                patch.apply_to(item);
                Outcome::Applied
            }
            None => Outcome::NotFound,
        };
        self.finish(id, outcome)
    }

    /// Flip the completion flag of the item with `id`
    pub fn toggle_completion(&mut self, id: &str) -> Outcome {
        let outcome = match self.find_mut(id) {
            Some(item) => {
                item.completed = !item.completed;
                Outcome::Applied
            }
            None => Outcome::NotFound,
        };
        self.finish(id, outcome)
    }

    /// Remove the item with `id`, keeping the order of the rest
    pub fn delete(&mut self, id: &str) -> Outcome {
        let outcome = match self.items.iter().position(|item| item.id == id) {
            Some(pos) => {
                self.items.remove(pos);
                Outcome::Applied
            }
            None => Outcome::NotFound,
        };
        self.finish(id, outcome)
    }

    /// Items in display (insertion) order
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Find an item by id
    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current save failure, if not yet dismissed
    pub fn notice(&self) -> Option<&PendingNotice> {
        self.notice.as_ref()
    }

    /// The current save failure, but only the first time it is asked for
    ///
    /// Rendering calls this on every pass; a notice already handed out is
    /// not handed out again until a new failure replaces it.
    pub fn unshown_notice(&mut self) -> Option<&PendingNotice> {
        let notice = self.notice.as_ref()?;
        if self.shown_notice == Some(notice.id) {
            return None;
        }
        self.shown_notice = Some(notice.id);
        Some(notice)
    }

    /// Clear the notice with `notice_id`
    ///
    /// Returns false when that notice was already replaced or dismissed.
    pub fn dismiss_notice(&mut self, notice_id: u64) -> bool {
        match &self.notice {
            Some(notice) if notice.id == notice_id => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut TodoItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if self.get(&id).is_none() {
                return id;
            }
            warn!(id = %id, "generated id already in use, drawing another");
        }
    }

    fn finish(&mut self, id: &str, outcome: Outcome) -> Outcome {
        if outcome == Outcome::NotFound {
            debug!(id = %id, "no todo with this id");
        }
        self.persist();
        outcome
    }

    fn persist(&mut self) {
        if self.phase != Phase::Initialized {
            return;
        }
        if let Err(error) = gateway::save(&mut self.store, &self.items) {
            self.notice_counter += 1;
            self.notice = Some(PendingNotice {
                id: self.notice_counter,
                error,
            });
        }
    }
}
