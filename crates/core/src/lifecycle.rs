//! Lifecycle state for sparks, ideas, and projects.
//!
//! Transitions: `active → archived` (archive), `active|archived → deleted`
//! (hard delete), and for sparks `active → consumed` (promotion, equivalent
//! to deletion but causally tied to the idea it produced). There is no
//! transition back from archived to active.

use serde::{Deserialize, Serialize};

/// Soft-delete state of an entity, derived from its `archived_at` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Active,
    Archived,
}

impl Lifecycle {
    pub fn of(archived_at: Option<&str>) -> Self {
        match archived_at {
            None => Self::Active,
            Some(_) => Self::Archived,
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}
