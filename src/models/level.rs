//! School level scoping.
//!
//! Every roster entity is tagged with the school tier it belongs to.
//! `Both` marks shared entities — a teacher covering primary and
//! secondary classes, or a time block used by either timetable.

use serde::{Deserialize, Serialize};

/// School tier an entity belongs to or applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchoolLevel {
    Primary,
    Secondary,
    /// Shared between both tiers.
    Both,
}

impl SchoolLevel {
    /// Whether an entity tagged with `self` is in scope for `level`.
    ///
    /// `Both` matches either side of the comparison; a concrete level
    /// matches only itself.
    #[inline]
    pub fn applies_to(&self, level: SchoolLevel) -> bool {
        *self == level || *self == SchoolLevel::Both || level == SchoolLevel::Both
    }
}
