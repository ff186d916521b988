//! Room model.

use serde::{Deserialize, Serialize};

/// A teaching room.
///
/// Generic classrooms and specialized rooms form disjoint pools: a
/// subject that requires special facilities is placed only in rooms
/// whose specialization tag matches, and every other subject is placed
/// only in non-specialized rooms. `max_students` is a hard cap that
/// overrides seating capacity on specialized rooms (e.g. workstation
/// count in a computer lab).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Whether this is a specialized room.
    pub is_specialized: bool,
    /// Specialization tag (e.g. "Computing").
    pub specialized_for: Option<String>,
    /// Hard student-count cap overriding capacity when set.
    pub max_students: Option<u32>,
}

impl Room {
    /// Creates a generic classroom seating 30.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity: 30,
            is_specialized: false,
            specialized_for: None,
            max_students: None,
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Marks the room as specialized for the given tag.
    pub fn with_specialization(mut self, tag: impl Into<String>) -> Self {
        self.is_specialized = true;
        self.specialized_for = Some(tag.into());
        self
    }

    /// Sets the hard student-count cap.
    pub fn with_max_students(mut self, max: u32) -> Self {
        self.max_students = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("r1")
            .with_name("Computing Lab")
            .with_capacity(30)
            .with_specialization("Computing")
            .with_max_students(30);

        assert_eq!(r.name, "Computing Lab");
        assert!(r.is_specialized);
        assert_eq!(r.specialized_for.as_deref(), Some("Computing"));
        assert_eq!(r.max_students, Some(30));
    }

    #[test]
    fn test_room_defaults() {
        let r = Room::new("r1");
        assert_eq!(r.capacity, 30);
        assert!(!r.is_specialized);
        assert!(r.specialized_for.is_none());
        assert!(r.max_students.is_none());
    }
}
