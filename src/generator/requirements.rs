//! Requirement extraction.
//!
//! A requirement is one (grade, subject) curriculum link together with
//! the subject's weekly frequency: the number of sessions the generator
//! must place for it. The sum of occurrences across all requirements is
//! the search target for one generation run.

use serde::{Deserialize, Serialize};

use crate::models::Roster;

/// One (grade, subject) demand the generator must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub grade_id: String,
    pub subject_id: String,
    /// Weekly sessions to place.
    pub occurrences: usize,
}

/// Builds the requirement list from a roster's curriculum links.
///
/// Grades are walked in roster order; dangling links are skipped (the
/// roster integrity pass reports them separately).
pub fn extract_requirements(roster: &Roster) -> Vec<Requirement> {
    let mut requirements = Vec::new();
    for grade in &roster.grades {
        for link in roster.grade_subjects.iter().filter(|l| l.grade_id == grade.id) {
            if let Some(subject) = roster.subject(&link.subject_id) {
                requirements.push(Requirement {
                    grade_id: grade.id.clone(),
                    subject_id: subject.id.clone(),
                    occurrences: subject.weekly_frequency as usize,
                });
            }
        }
    }
    requirements
}

/// Total occurrences across a requirement list.
pub fn total_occurrences(requirements: &[Requirement]) -> usize {
    requirements.iter().map(|r| r.occurrences).sum()
}
