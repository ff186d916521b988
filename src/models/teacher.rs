//! Teacher model.
//!
//! Teachers carry a fractional weekly hour budget and are linked to the
//! subjects they may teach through [`TeacherSubject`] records. The hour
//! budget is a soft limit: exceeding it is reported as a warning, not
//! rejected.

use serde::{Deserialize, Serialize};

use super::SchoolLevel;

/// Default weekly teaching budget in hours.
pub const DEFAULT_MAX_WEEKLY_HOURS: f64 = 27.0;

/// A teacher on the school roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Tier(s) the teacher covers.
    pub level: SchoolLevel,
    /// Weekly teaching budget in hours. Fractional: a 45-minute session
    /// consumes 0.75.
    pub max_weekly_hours: f64,
}

impl Teacher {
    /// Creates a teacher with the default hour budget.
    pub fn new(id: impl Into<String>, level: SchoolLevel) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            level,
            max_weekly_hours: DEFAULT_MAX_WEEKLY_HOURS,
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekly hour budget.
    pub fn with_max_weekly_hours(mut self, hours: f64) -> Self {
        self.max_weekly_hours = hours;
        self
    }
}

/// Qualification link: the teacher may be assigned to the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSubject {
    pub teacher_id: String,
    pub subject_id: String,
}

impl TeacherSubject {
    /// Creates a qualification link.
    pub fn new(teacher_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            subject_id: subject_id.into(),
        }
    }
}
