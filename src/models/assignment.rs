//! Assignment and conflict models.
//!
//! An assignment pins one (teacher, subject, grade, room, time block)
//! tuple into the timetable. Validation attaches zero or more conflicts;
//! any error-severity conflict marks the record [`AssignmentStatus::Conflict`]
//! instead of rejecting it, so operators see the problem and fix it.
//! Conflict lists are recomputed wholesale on every validation pass,
//! never patched incrementally.

use serde::{Deserialize, Serialize};

/// A proposed (teacher, subject, grade, room, time block) tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentCandidate {
    pub teacher_id: String,
    pub subject_id: String,
    pub grade_id: String,
    pub room_id: String,
    pub time_block_id: String,
}

impl AssignmentCandidate {
    /// Creates a candidate tuple.
    pub fn new(
        teacher_id: impl Into<String>,
        subject_id: impl Into<String>,
        grade_id: impl Into<String>,
        room_id: impl Into<String>,
        time_block_id: impl Into<String>,
    ) -> Self {
        Self {
            teacher_id: teacher_id.into(),
            subject_id: subject_id.into(),
            grade_id: grade_id.into(),
            room_id: room_id.into(),
            time_block_id: time_block_id.into(),
        }
    }
}

/// Persisted assignment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignmentStatus {
    /// No error-severity conflicts.
    Confirmed,
    /// Carries at least one error-severity conflict.
    Conflict,
}

impl AssignmentStatus {
    /// Derives the persisted status from a validation result.
    pub fn from_conflicts(conflicts: &[Conflict]) -> Self {
        if conflicts.iter().any(Conflict::is_error) {
            AssignmentStatus::Conflict
        } else {
            AssignmentStatus::Confirmed
        }
    }
}

/// Conflict severity.
///
/// Errors violate hard constraints; warnings flag soft-constraint
/// breaches that do not block confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
}

/// Classification of assignment conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    /// The teacher already has an assignment in this block.
    TeacherDoubleBooking,
    /// The room is already occupied in this block.
    RoomDoubleBooking,
    /// The grade already has a session in this block.
    GradeDoubleBooking,
    /// The grade does not fit the room.
    RoomCapacityExceeded,
    /// The teacher's weekly hour budget would be exceeded.
    TeacherMaxHoursExceeded,
    /// Secondary sessions must be 60 minutes.
    SecondaryDurationInvalid,
}

/// A recorded constraint violation, owned by exactly one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Type of violation.
    pub conflict_type: ConflictType,
    /// Severity.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
}

impl Conflict {
    /// Creates a teacher double-booking conflict.
    pub fn teacher_double_booking(description: impl Into<String>) -> Self {
        Self {
            conflict_type: ConflictType::TeacherDoubleBooking,
            severity: Severity::Error,
            description: description.into(),
        }
    }

    /// Creates a room double-booking conflict.
    pub fn room_double_booking(description: impl Into<String>) -> Self {
        Self {
            conflict_type: ConflictType::RoomDoubleBooking,
            severity: Severity::Error,
            description: description.into(),
        }
    }

    /// Creates a grade double-booking conflict.
    pub fn grade_double_booking(description: impl Into<String>) -> Self {
        Self {
            conflict_type: ConflictType::GradeDoubleBooking,
            severity: Severity::Error,
            description: description.into(),
        }
    }

    /// Creates a room capacity conflict.
    pub fn room_capacity_exceeded(description: impl Into<String>) -> Self {
        Self {
            conflict_type: ConflictType::RoomCapacityExceeded,
            severity: Severity::Error,
            description: description.into(),
        }
    }

    /// Creates a teacher hour-budget conflict (warning, non-blocking).
    pub fn teacher_max_hours_exceeded(description: impl Into<String>) -> Self {
        Self {
            conflict_type: ConflictType::TeacherMaxHoursExceeded,
            severity: Severity::Warning,
            description: description.into(),
        }
    }

    /// Creates a secondary session-length conflict.
    pub fn secondary_duration_invalid(description: impl Into<String>) -> Self {
        Self {
            conflict_type: ConflictType::SecondaryDurationInvalid,
            severity: Severity::Error,
            description: description.into(),
        }
    }

    /// Whether this conflict has error severity.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// A committed timetable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique assignment identifier.
    pub id: String,
    pub teacher_id: String,
    pub subject_id: String,
    pub grade_id: String,
    pub room_id: String,
    pub time_block_id: String,
    /// Persisted state, derived from the conflict list.
    pub status: AssignmentStatus,
    /// Conflicts recorded by the last validation pass.
    pub conflicts: Vec<Conflict>,
}

impl Assignment {
    /// Creates a confirmed assignment with no conflicts recorded.
    pub fn new(id: impl Into<String>, candidate: &AssignmentCandidate) -> Self {
        Self {
            id: id.into(),
            teacher_id: candidate.teacher_id.clone(),
            subject_id: candidate.subject_id.clone(),
            grade_id: candidate.grade_id.clone(),
            room_id: candidate.room_id.clone(),
            time_block_id: candidate.time_block_id.clone(),
            status: AssignmentStatus::Confirmed,
            conflicts: Vec::new(),
        }
    }

    /// Replaces the conflict list wholesale and re-derives the status.
    pub fn with_conflicts(mut self, conflicts: Vec<Conflict>) -> Self {
        self.status = AssignmentStatus::from_conflicts(&conflicts);
        self.conflicts = conflicts;
        self
    }

    /// The candidate tuple this assignment pins down.
    pub fn candidate(&self) -> AssignmentCandidate {
        AssignmentCandidate::new(
            &self.teacher_id,
            &self.subject_id,
            &self.grade_id,
            &self.room_id,
            &self.time_block_id,
        )
    }

    /// Whether any recorded conflict has error severity.
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.conflicts.iter().any(Conflict::is_error)
    }
}
