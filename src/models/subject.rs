//! Subject model.

use serde::{Deserialize, Serialize};

use super::{SchoolLevel, SessionDuration};

/// A subject taught at the school.
///
/// `weekly_frequency` is the number of sessions every enrolled grade
/// must receive per week — the unit the generator plans in. Subjects
/// that need special facilities (labs) carry a room specialization tag;
/// all other subjects are placed in generic classrooms only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Tier(s) the subject is taught at.
    pub level: SchoolLevel,
    /// Required sessions per week for each enrolled grade.
    pub weekly_frequency: u32,
    /// Default session length.
    pub default_duration: SessionDuration,
    /// Whether sessions must run in a specialized room.
    pub requires_special_room: bool,
    /// Specialization tag the room must carry (e.g. "Computing").
    pub special_room_type: Option<String>,
}

impl Subject {
    /// Creates a subject with one weekly session of the default length.
    pub fn new(id: impl Into<String>, level: SchoolLevel) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            level,
            weekly_frequency: 1,
            default_duration: SessionDuration::Sixty,
            requires_special_room: false,
            special_room_type: None,
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the required sessions per week.
    pub fn with_weekly_frequency(mut self, frequency: u32) -> Self {
        self.weekly_frequency = frequency;
        self
    }

    /// Sets the default session length.
    pub fn with_duration(mut self, duration: SessionDuration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Requires a specialized room carrying the given tag.
    pub fn with_special_room(mut self, room_type: impl Into<String>) -> Self {
        self.requires_special_room = true;
        self.special_room_type = Some(room_type.into());
        self
    }
}

/// Curriculum link: the grade receives the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSubject {
    pub grade_id: String,
    pub subject_id: String,
}

impl GradeSubject {
    /// Creates a curriculum link.
    pub fn new(grade_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            grade_id: grade_id.into(),
            subject_id: subject_id.into(),
        }
    }
}
