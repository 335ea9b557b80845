//! Role domain entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named role users can be members of.
///
/// Names are looked up as if unique, but nothing here enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
}

impl Role {
    /// Create a role with a fresh identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
