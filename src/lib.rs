//! Session Todos Library
//!
//! A todo list whose persistence is scoped to one session. The list lives in
//! memory, is written to session storage after every change, and is read
//! back (and validated) once at startup.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Shell Layer**: `Shell` - Parses line commands and presents save failures as notifications
//! - **Domain Layer**: `controller` module - The `TodoList` aggregate and its CRUD operations
//! - **Persistence Layer**: `gateway` and `storage` modules - JSON under a fixed key in a
//!   quota-limited session store
//!
//! # Example
//!
//! ```
//! use session_todos::{MemorySessionStore, TodoList, TodoPatch};
//! use session_todos::ids::SequentialIds;
//!
//! let mut list = TodoList::new(MemorySessionStore::new(), SequentialIds::new());
//! list.initialize();
//!
//! let id = list.add("Buy milk", "Oat, two cartons").id.clone();
//! list.edit(&id, TodoPatch::new().title("Buy oat milk"));
//! list.toggle_completion(&id);
//! assert!(list.get(&id).unwrap().completed);
//!
//! list.delete(&id);
//! assert!(list.is_empty());
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod formatting;
pub mod gateway;
pub mod ids;
pub mod logging;
pub mod notification;
pub mod shell;
pub mod storage;
pub mod todo;

// Re-export commonly used types
pub use controller::{Outcome, PendingNotice, Phase, TodoList};
pub use gateway::{STORAGE_KEY, SaveError};
pub use shell::Shell;
pub use storage::{MemorySessionStore, SessionStore, StorageError};
pub use todo::{TodoItem, TodoPatch};
