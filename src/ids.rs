//! Identifier generation for new todo items

use uuid::Uuid;

/// Source of unique, opaque item ids
pub trait IdGenerator {
    /// Produce an id not returned before
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, e.g. `"9b2f1d2e-..."`
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Short counter-based ids: `"#1"`, `"#2"`, ...
///
/// Easier to type in the shell than UUIDs. Uniqueness only holds within
/// one counter; the list skips ids that are already taken.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counter: u32,
}

impl SequentialIds {
    /// Start counting from 1
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("#{}", self.counter)
    }
}

/// Either scheme, chosen at runtime from configuration
#[derive(Debug, Clone)]
pub enum AnyIds {
    Uuid(UuidGenerator),
    Sequential(SequentialIds),
}

impl IdGenerator for AnyIds {
    fn next_id(&mut self) -> String {
        match self {
            AnyIds::Uuid(ids) => ids.next_id(),
            AnyIds::Sequential(ids) => ids.next_id(),
        }
    }
}
