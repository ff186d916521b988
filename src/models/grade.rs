//! Grade (class cohort) model.

use serde::{Deserialize, Serialize};

use super::SchoolLevel;

/// A class cohort: one group of students taught together.
///
/// Grades are the scheduling consumers — every curriculum link a grade
/// carries must receive its subject's weekly frequency of sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    /// Unique grade identifier.
    pub id: String,
    /// Display name (e.g. "9").
    pub name: String,
    /// Section letter (e.g. "A").
    pub section: String,
    /// Tier the grade belongs to.
    pub level: SchoolLevel,
    /// Number of enrolled students.
    pub student_count: u32,
}

impl Grade {
    /// Creates a grade with no students enrolled.
    pub fn new(id: impl Into<String>, level: SchoolLevel) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            section: String::new(),
            level,
            student_count: 0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the section letter.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Sets the enrolled student count.
    pub fn with_student_count(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }

    /// Display label: name followed by section (e.g. "9A").
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.section)
    }
}
