//! Assignment validation.
//!
//! Two layers of checking:
//! - **Roster integrity** — structural checks on the entity snapshot
//!   (duplicate IDs, dangling links, empty curricula, bad weekdays),
//!   run before generation so the search never chases broken input.
//! - **Candidate validation** — checks one proposed assignment against
//!   the committed timetable and the placement rules, returning the
//!   full conflict list rather than stopping at the first hit. A
//!   candidate may and should report every applicable violation at
//!   once.
//!
//! Candidate validation is a pure function over the snapshot it is
//! given: no side effects, deterministic, safe to call concurrently.
//! Commit decisions between mutually exclusive candidates are
//! serialized by the repository, never by this advisory read.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{
    Assignment, AssignmentCandidate, Conflict, Roster, SchoolLevel, SessionDuration,
};
use crate::repository::{AssignmentFilter, RepositoryError, ScheduleRepository};

/// Room specialization tag subject to the fixed headcount cap.
pub const COMPUTING_ROOM_TAG: &str = "Computing";

/// Fallback headcount cap for Computing rooms without an explicit
/// `max_students` limit.
pub const COMPUTING_ROOM_CAP: u32 = 30;

/// Precondition failure: validation could not run at all.
///
/// Distinct from a conflict — a missing reference aborts the call
/// instead of producing an empty (falsely clean) conflict list.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The candidate references an entity the roster does not contain.
    #[error("unknown {entity} '{id}' referenced by candidate")]
    MissingEntity { entity: &'static str, id: String },
    /// The backing store failed while assembling the snapshot.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ValidationError {
    fn missing(entity: &'static str, id: &str) -> Self {
        Self::MissingEntity {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result of a roster integrity pass.
pub type RosterResult = Result<(), Vec<RosterIssue>>;

/// A roster integrity problem.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterIssue {
    /// Issue category.
    pub kind: RosterIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of roster integrity problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterIssueKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A qualification link references an unknown teacher or subject.
    DanglingQualification,
    /// A curriculum link references an unknown grade or subject.
    DanglingCurriculum,
    /// A grade has no subjects on its curriculum.
    EmptyCurriculum,
    /// A time block's weekday is outside Monday–Friday.
    InvalidWeekday,
}

impl RosterIssue {
    fn new(kind: RosterIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structural integrity of a roster.
///
/// Checks:
/// 1. No duplicate IDs within each entity kind
/// 2. All qualification links point to existing teachers and subjects
/// 3. All curriculum links point to existing grades and subjects
/// 4. Every grade has at least one curriculum link
/// 5. Time block weekdays fall in 1–5
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(issues)` with every detected
/// problem.
pub fn validate_roster(roster: &Roster) -> RosterResult {
    let mut issues = Vec::new();

    let mut teacher_ids = HashSet::new();
    for t in &roster.teachers {
        if !teacher_ids.insert(t.id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DuplicateId,
                format!("Duplicate teacher ID: {}", t.id),
            ));
        }
    }

    let mut subject_ids = HashSet::new();
    for s in &roster.subjects {
        if !subject_ids.insert(s.id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DuplicateId,
                format!("Duplicate subject ID: {}", s.id),
            ));
        }
    }

    let mut grade_ids = HashSet::new();
    for g in &roster.grades {
        if !grade_ids.insert(g.id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DuplicateId,
                format!("Duplicate grade ID: {}", g.id),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for r in &roster.rooms {
        if !room_ids.insert(r.id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    let mut block_ids = HashSet::new();
    for b in &roster.time_blocks {
        if !block_ids.insert(b.id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DuplicateId,
                format!("Duplicate time block ID: {}", b.id),
            ));
        }
        if !(1..=5).contains(&b.day_of_week) {
            issues.push(RosterIssue::new(
                RosterIssueKind::InvalidWeekday,
                format!(
                    "Time block '{}' has weekday {} (expected 1-5)",
                    b.id, b.day_of_week
                ),
            ));
        }
    }

    for link in &roster.teacher_subjects {
        if !teacher_ids.contains(link.teacher_id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DanglingQualification,
                format!("Qualification references unknown teacher '{}'", link.teacher_id),
            ));
        }
        if !subject_ids.contains(link.subject_id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DanglingQualification,
                format!("Qualification references unknown subject '{}'", link.subject_id),
            ));
        }
    }

    for link in &roster.grade_subjects {
        if !grade_ids.contains(link.grade_id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DanglingCurriculum,
                format!("Curriculum references unknown grade '{}'", link.grade_id),
            ));
        }
        if !subject_ids.contains(link.subject_id.as_str()) {
            issues.push(RosterIssue::new(
                RosterIssueKind::DanglingCurriculum,
                format!("Curriculum references unknown subject '{}'", link.subject_id),
            ));
        }
    }

    for g in &roster.grades {
        if !roster.grade_subjects.iter().any(|l| l.grade_id == g.id) {
            issues.push(RosterIssue::new(
                RosterIssueKind::EmptyCurriculum,
                format!("Grade '{}' has no subjects on its curriculum", g.id),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validates a candidate assignment against the committed set.
///
/// Checks, each appended independently:
/// 1. Teacher double-booking (error)
/// 2. Room double-booking (error)
/// 3. Grade double-booking (error)
/// 4. Room capacity exceeded (error)
/// 5. Computing-room headcount cap (error; fires independently of 4)
/// 6. Teacher weekly hour budget exceeded (warning)
/// 7. Secondary sessions must be 60 minutes (error)
///
/// `exempt` excludes one assignment ID from the double-booking and hour
/// checks — used when re-validating an assignment being edited in
/// place, so it does not conflict with its own prior version.
///
/// # Errors
/// [`ValidationError::MissingEntity`] if any of the five referenced
/// entities is absent from the roster.
pub fn validate_candidate(
    roster: &Roster,
    existing: &[Assignment],
    candidate: &AssignmentCandidate,
    exempt: Option<&str>,
) -> Result<Vec<Conflict>, ValidationError> {
    let teacher = roster
        .teacher(&candidate.teacher_id)
        .ok_or_else(|| ValidationError::missing("teacher", &candidate.teacher_id))?;
    if roster.subject(&candidate.subject_id).is_none() {
        return Err(ValidationError::missing("subject", &candidate.subject_id));
    }
    let grade = roster
        .grade(&candidate.grade_id)
        .ok_or_else(|| ValidationError::missing("grade", &candidate.grade_id))?;
    let room = roster
        .room(&candidate.room_id)
        .ok_or_else(|| ValidationError::missing("room", &candidate.room_id))?;
    let block = roster
        .time_block(&candidate.time_block_id)
        .ok_or_else(|| ValidationError::missing("time block", &candidate.time_block_id))?;

    let mut conflicts = Vec::new();

    // Double-booking scans are scoped to the candidate's block.
    let same_block: Vec<&Assignment> = existing
        .iter()
        .filter(|a| a.time_block_id == candidate.time_block_id && exempt != Some(a.id.as_str()))
        .collect();

    if same_block.iter().any(|a| a.teacher_id == candidate.teacher_id) {
        conflicts.push(Conflict::teacher_double_booking(format!(
            "teacher '{}' already has an assignment in time block '{}'",
            teacher.name, block.id
        )));
    }

    if same_block.iter().any(|a| a.room_id == candidate.room_id) {
        conflicts.push(Conflict::room_double_booking(format!(
            "room '{}' is already occupied in time block '{}'",
            room.name, block.id
        )));
    }

    if same_block.iter().any(|a| a.grade_id == candidate.grade_id) {
        conflicts.push(Conflict::grade_double_booking(format!(
            "grade {} already has a session in time block '{}'",
            grade.label(),
            block.id
        )));
    }

    if grade.student_count > room.capacity {
        conflicts.push(Conflict::room_capacity_exceeded(format!(
            "grade {} has {} students but room '{}' seats {}",
            grade.label(),
            grade.student_count,
            room.name,
            room.capacity
        )));
    }

    // The Computing cap fires on its own, independent of seating
    // capacity: workstation count is the binding limit in a lab.
    if room.specialized_for.as_deref() == Some(COMPUTING_ROOM_TAG) {
        let cap = room.max_students.unwrap_or(COMPUTING_ROOM_CAP);
        if grade.student_count > cap {
            conflicts.push(Conflict::room_capacity_exceeded(format!(
                "room '{}' is limited to {} students for computing sessions",
                room.name, cap
            )));
        }
    }

    let mut total_hours: f64 = existing
        .iter()
        .filter(|a| a.teacher_id == candidate.teacher_id && exempt != Some(a.id.as_str()))
        .filter_map(|a| roster.time_block(&a.time_block_id))
        .map(|b| b.duration.hours())
        .sum();
    total_hours += block.duration.hours();
    if total_hours > teacher.max_weekly_hours {
        conflicts.push(Conflict::teacher_max_hours_exceeded(format!(
            "teacher '{}' would reach {:.2}h of a {:.2}h weekly budget",
            teacher.name, total_hours, teacher.max_weekly_hours
        )));
    }

    if grade.level == SchoolLevel::Secondary && block.duration != SessionDuration::Sixty {
        conflicts.push(Conflict::secondary_duration_invalid(format!(
            "secondary sessions are fixed at 60 minutes; block '{}' is {} minutes",
            block.id,
            block.duration.minutes()
        )));
    }

    Ok(conflicts)
}

/// Validates a candidate against the repository's current state.
///
/// Assembles the full roster and committed assignment set, then runs
/// [`validate_candidate`]. This is the entry point the manual-edit path
/// calls before persisting one assignment.
pub fn validate_assignment<R: ScheduleRepository>(
    repository: &R,
    candidate: &AssignmentCandidate,
    exempt: Option<&str>,
) -> Result<Vec<Conflict>, ValidationError> {
    let roster = repository.roster(None)?;
    let existing = repository.assignments(&AssignmentFilter::default())?;
    validate_candidate(&roster, &existing, candidate, exempt)
}

/// Validates a candidate and assembles the record to persist.
///
/// The returned assignment carries the freshly computed conflict list
/// (replacing any prior list wholesale) and the status derived from it:
/// error conflicts mark the record `Conflict` but do not reject it —
/// visibility over blocking. Persisting the record stays with the
/// caller.
pub fn plan_assignment<R: ScheduleRepository>(
    repository: &R,
    id: impl Into<String>,
    candidate: &AssignmentCandidate,
    exempt: Option<&str>,
) -> Result<Assignment, ValidationError> {
    let conflicts = validate_assignment(repository, candidate, exempt)?;
    Ok(Assignment::new(id, candidate).with_conflicts(conflicts))
}
