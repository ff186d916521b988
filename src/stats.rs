//! Aggregate timetable statistics.
//!
//! Operator-facing counts and load figures computed from a roster and
//! the committed assignment set: how much of the timetable is placed,
//! how much of it is in conflict, and how loaded each teacher is
//! against their weekly hour budget.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Assignment, AssignmentStatus, Roster};

/// Timetable-wide summary figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableStats {
    pub teacher_count: usize,
    pub subject_count: usize,
    pub grade_count: usize,
    pub room_count: usize,
    /// Committed assignments.
    pub assignment_count: usize,
    /// Assignments with no error-severity conflicts.
    pub confirmed_count: usize,
    /// Assignments carrying at least one error-severity conflict.
    pub conflicted_count: usize,
    /// Error-severity conflict records across all assignments.
    pub error_conflicts: usize,
    /// Warning-severity conflict records across all assignments.
    pub warning_conflicts: usize,
    /// Committed duration-hours per teacher.
    pub hours_by_teacher: HashMap<String, f64>,
    /// Mean fraction of the teachers' weekly budgets in use.
    pub avg_teacher_utilization: f64,
}

impl TimetableStats {
    /// Computes statistics from a roster and the committed set.
    ///
    /// Hours resolve through the roster's block table with the same
    /// duration mapping the validator uses; assignments whose block is
    /// unknown contribute no hours.
    pub fn calculate(roster: &Roster, assignments: &[Assignment]) -> Self {
        let mut hours_by_teacher: HashMap<String, f64> = HashMap::new();
        let mut confirmed_count = 0usize;
        let mut conflicted_count = 0usize;
        let mut error_conflicts = 0usize;
        let mut warning_conflicts = 0usize;

        for a in assignments {
            match a.status {
                AssignmentStatus::Confirmed => confirmed_count += 1,
                AssignmentStatus::Conflict => conflicted_count += 1,
            }
            for c in &a.conflicts {
                if c.is_error() {
                    error_conflicts += 1;
                } else {
                    warning_conflicts += 1;
                }
            }
            if let Some(block) = roster.time_block(&a.time_block_id) {
                *hours_by_teacher.entry(a.teacher_id.clone()).or_insert(0.0) +=
                    block.duration.hours();
            }
        }

        let avg_teacher_utilization = if roster.teachers.is_empty() {
            0.0
        } else {
            let sum: f64 = roster
                .teachers
                .iter()
                .map(|t| {
                    let hours = hours_by_teacher.get(&t.id).copied().unwrap_or(0.0);
                    if t.max_weekly_hours > 0.0 {
                        hours / t.max_weekly_hours
                    } else {
                        0.0
                    }
                })
                .sum();
            sum / roster.teachers.len() as f64
        };

        Self {
            teacher_count: roster.teachers.len(),
            subject_count: roster.subjects.len(),
            grade_count: roster.grades.len(),
            room_count: roster.rooms.len(),
            assignment_count: assignments.len(),
            confirmed_count,
            conflicted_count,
            error_conflicts,
            warning_conflicts,
            hours_by_teacher,
            avg_teacher_utilization,
        }
    }

    /// Teachers whose committed hours exceed their weekly budget.
    pub fn overloaded_teachers(&self, roster: &Roster) -> Vec<String> {
        roster
            .teachers
            .iter()
            .filter(|t| {
                self.hours_by_teacher.get(&t.id).copied().unwrap_or(0.0) > t.max_weekly_hours
            })
            .map(|t| t.id.clone())
            .collect()
    }
}
