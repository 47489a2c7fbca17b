//! String-keyed persistence capability.

use crate::error::GlueError;

/// A single global key-value store with last-write-wins semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), GlueError>;
}
