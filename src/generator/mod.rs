//! Automatic timetable generation.
//!
//! Fills one school level's weekly timetable from the roster: every
//! (grade, subject) curriculum link must receive its subject's weekly
//! frequency of sessions, each placed on a (teacher, room, time block)
//! triple the validator accepts. Regeneration is wholesale — the
//! level's previous assignments are discarded, never patched.
//!
//! Two search strategies:
//! - [`SearchStrategy::Greedy`] — one randomized pass; the first legal
//!   placement wins and is never reconsidered. Fast, but an early pick
//!   can starve a later requirement that had fewer alternatives.
//! - [`SearchStrategy::Backtracking`] (default) — depth-first search
//!   that undoes placements on dead ends, bounded by an attempt budget.
//!   Complete within the budget.
//!
//! Either way, placements are staged in memory and flushed to the
//! repository in a single `replace_level` transaction, so readers never
//! observe a half-regenerated level. Search order is randomized to
//! avoid always filling the same early blocks; fix the seed for
//! reproducible output.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Even, Itai & Shamir (1976), "On the Complexity of Timetable and
//!   Multicommodity Flow Problems"

mod backtracking;
mod greedy;
mod occupancy;
mod requirements;

pub use occupancy::OccupancyMap;
pub use requirements::{extract_requirements, total_occurrences, Requirement};

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{
    Assignment, Grade, Room, Roster, SchoolLevel, SessionDuration, Subject, TimeBlock,
};
use crate::repository::{AssignmentFilter, RepositoryError, ScheduleRepository};
use crate::validation::{
    validate_roster, RosterIssue, ValidationError, COMPUTING_ROOM_CAP, COMPUTING_ROOM_TAG,
};

/// Default cap on placement attempts for the backtracking strategy.
pub const DEFAULT_ATTEMPT_BUDGET: usize = 50_000;

/// How the generator searches the placement space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Single randomized pass; commitments are final.
    Greedy,
    /// Depth-first search with undo, bounded by the attempt budget.
    #[default]
    Backtracking,
}

/// Generation parameters.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Search strategy.
    pub strategy: SearchStrategy,
    /// Fixed seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Upper bound on placement attempts (backtracking only).
    pub attempt_budget: usize,
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            strategy: SearchStrategy::default(),
            seed: None,
            attempt_budget: DEFAULT_ATTEMPT_BUDGET,
        }
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the attempt budget.
    pub fn with_attempt_budget(mut self, budget: usize) -> Self {
        self.attempt_budget = budget;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome summary of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Requirement occurrences successfully placed.
    pub assigned: usize,
    /// Occurrences that could not be placed.
    pub skipped: usize,
    /// Whether every occurrence was placed.
    pub success: bool,
}

/// Generation failure.
///
/// A partially filled timetable is *not* a failure — it is reported
/// through [`GenerationOutcome::skipped`].
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Generation operates on one concrete level at a time.
    #[error("generation requires a concrete school level, got {0:?}")]
    AmbiguousLevel(SchoolLevel),
    /// The roster failed its integrity checks.
    #[error("roster failed integrity checks ({} issue(s))", .0.len())]
    InvalidRoster(Vec<RosterIssue>),
    /// The backing store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// A candidate referenced an entity missing from the snapshot.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result of a strategy run, before the flush.
pub(crate) struct SearchResult {
    /// Newly staged assignments (cross-level survivors excluded).
    pub assignments: Vec<Assignment>,
    pub assigned: usize,
    pub skipped: usize,
}

/// Fills a school level's timetable through a [`ScheduleRepository`].
///
/// # Example
/// ```
/// use class_timetable::generator::{GeneratorConfig, ScheduleGenerator};
/// use class_timetable::models::{
///     Grade, Room, Roster, SchoolLevel, SessionDuration, Subject, Teacher, TimeBlock,
/// };
/// use class_timetable::repository::InMemoryRepository;
///
/// let roster = Roster::new()
///     .with_teacher(Teacher::new("t1", SchoolLevel::Secondary).with_name("Emilio"))
///     .with_subject(Subject::new("math", SchoolLevel::Secondary).with_weekly_frequency(2))
///     .with_grade(Grade::new("9a", SchoolLevel::Secondary).with_student_count(28))
///     .with_room(Room::new("r1").with_capacity(35))
///     .with_time_block(TimeBlock::new("b1", 1, SessionDuration::Sixty))
///     .with_time_block(TimeBlock::new("b2", 2, SessionDuration::Sixty))
///     .with_qualification("t1", "math")
///     .with_curriculum("9a", "math");
/// let repository = InMemoryRepository::from_roster(roster);
///
/// let generator = ScheduleGenerator::new(&repository)
///     .with_config(GeneratorConfig::default().with_seed(42));
/// let outcome = generator.generate(SchoolLevel::Secondary).unwrap();
/// assert!(outcome.success);
/// assert_eq!(outcome.assigned, 2);
/// ```
pub struct ScheduleGenerator<'a, R: ScheduleRepository> {
    repository: &'a R,
    config: GeneratorConfig,
}

impl<'a, R: ScheduleRepository> ScheduleGenerator<'a, R> {
    /// Creates a generator with the default configuration.
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            config: GeneratorConfig::default(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Regenerates the timetable for one school level.
    ///
    /// Phases: roster load → integrity check → requirement extraction →
    /// search → atomic flush. Assignments outside the level survive and
    /// stay visible to the validator, so shared teachers and rooms
    /// cannot be double-booked across levels.
    pub fn generate(&self, level: SchoolLevel) -> Result<GenerationOutcome, GeneratorError> {
        if level == SchoolLevel::Both {
            return Err(GeneratorError::AmbiguousLevel(level));
        }

        let roster = self.repository.roster(Some(level))?;
        validate_roster(&roster).map_err(GeneratorError::InvalidRoster)?;

        let requirements = extract_requirements(&roster);
        let total = total_occurrences(&requirements);
        info!(
            ?level,
            requirements = requirements.len(),
            occurrences = total,
            strategy = ?self.config.strategy,
            "starting timetable generation"
        );

        // Everything outside this level's grades survives the reset.
        let scope: HashSet<&str> = roster.grades.iter().map(|g| g.id.as_str()).collect();
        let fixed: Vec<Assignment> = self
            .repository
            .assignments(&AssignmentFilter::default())?
            .into_iter()
            .filter(|a| !scope.contains(a.grade_id.as_str()))
            .collect();

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let result = match self.config.strategy {
            SearchStrategy::Greedy => greedy::fill(&roster, &requirements, &fixed, level, &mut rng)?,
            SearchStrategy::Backtracking => backtracking::fill(
                &roster,
                &requirements,
                &fixed,
                level,
                &mut rng,
                self.config.attempt_budget,
            )?,
        };

        self.repository.replace_level(level, result.assignments)?;

        let outcome = GenerationOutcome {
            assigned: result.assigned,
            skipped: result.skipped,
            success: result.skipped == 0,
        };
        info!(
            assigned = outcome.assigned,
            skipped = outcome.skipped,
            success = outcome.success,
            "timetable generation finished"
        );
        Ok(outcome)
    }
}

/// Whether a room can host a (subject, grade) session at all.
///
/// Generic subjects use generic rooms; specialized subjects use rooms
/// whose specialization tag matches — the pools are disjoint. Capacity
/// limits are pre-filtered here so the search never proposes a
/// candidate the validator would reject.
pub(crate) fn room_eligible(subject: &Subject, grade: &Grade, room: &Room) -> bool {
    if grade.student_count > room.capacity {
        return false;
    }
    if room.specialized_for.as_deref() == Some(COMPUTING_ROOM_TAG)
        && grade.student_count > room.max_students.unwrap_or(COMPUTING_ROOM_CAP)
    {
        return false;
    }
    if subject.requires_special_room {
        room.is_specialized && room.specialized_for == subject.special_room_type
    } else {
        !room.is_specialized
    }
}

/// Whether a block's duration is admissible for the grade.
/// Secondary sessions are fixed at 60 minutes.
pub(crate) fn block_eligible(grade: &Grade, block: &TimeBlock) -> bool {
    grade.level != SchoolLevel::Secondary || block.duration == SessionDuration::Sixty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentCandidate, AssignmentStatus, Teacher};
    use crate::repository::InMemoryRepository;
    use crate::validation::validate_candidate;

    /// One secondary grade needing one subject twice a week, one
    /// qualified teacher with a 2-hour budget, one room, `blocks`
    /// non-overlapping 60-minute class blocks.
    fn school(blocks: usize) -> Roster {
        let mut roster = Roster::new()
            .with_teacher(
                Teacher::new("t1", SchoolLevel::Secondary)
                    .with_name("Emilio")
                    .with_max_weekly_hours(2.0),
            )
            .with_subject(
                Subject::new("math", SchoolLevel::Secondary)
                    .with_name("Mathematics")
                    .with_weekly_frequency(2),
            )
            .with_grade(
                Grade::new("9a", SchoolLevel::Secondary)
                    .with_name("9")
                    .with_section("A")
                    .with_student_count(28),
            )
            .with_room(Room::new("r1").with_name("Salon 13").with_capacity(35))
            .with_qualification("t1", "math")
            .with_curriculum("9a", "math");
        for i in 0..blocks {
            roster = roster.with_time_block(TimeBlock::new(
                format!("b{i}"),
                (i % 5 + 1) as u8,
                SessionDuration::Sixty,
            ));
        }
        roster
    }

    fn generate(repo: &InMemoryRepository, config: GeneratorConfig) -> GenerationOutcome {
        ScheduleGenerator::new(repo)
            .with_config(config)
            .generate(SchoolLevel::Secondary)
            .unwrap()
    }

    #[test]
    fn test_fills_all_occurrences() {
        let repo = InMemoryRepository::from_roster(school(2));
        let outcome = generate(&repo, GeneratorConfig::default().with_seed(1));

        assert_eq!(outcome.assigned, 2);
        assert_eq!(outcome.skipped, 0);
        assert!(outcome.success);

        let committed = repo.assignments(&AssignmentFilter::default()).unwrap();
        assert_eq!(committed.len(), 2);
        for a in &committed {
            assert_eq!(a.status, AssignmentStatus::Confirmed);
        }
    }

    #[test]
    fn test_partial_fill_reported_not_raised() {
        let repo = InMemoryRepository::from_roster(school(1));
        let outcome = generate(&repo, GeneratorConfig::default().with_seed(1));

        assert_eq!(outcome.assigned, 1);
        assert_eq!(outcome.skipped, 1);
        assert!(!outcome.success);
    }

    #[test]
    fn test_no_qualified_teacher_skips_requirement() {
        let mut roster = school(2);
        roster.teacher_subjects.clear();
        let repo = InMemoryRepository::from_roster(roster);
        let outcome = generate(&repo, GeneratorConfig::default().with_seed(1));

        assert_eq!(outcome.assigned, 0);
        assert_eq!(outcome.skipped, 2);
        assert!(!outcome.success);
    }

    #[test]
    fn test_accounting_invariant() {
        for blocks in [0, 1, 2, 5] {
            let repo = InMemoryRepository::from_roster(school(blocks));
            let outcome = generate(&repo, GeneratorConfig::default().with_seed(3));
            assert_eq!(outcome.assigned + outcome.skipped, 2);
        }
    }

    #[test]
    fn test_both_level_rejected() {
        let repo = InMemoryRepository::from_roster(school(2));
        let err = ScheduleGenerator::new(&repo)
            .generate(SchoolLevel::Both)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::AmbiguousLevel(_)));
    }

    #[test]
    fn test_invalid_roster_rejected() {
        let roster = school(2).with_teacher(Teacher::new("t1", SchoolLevel::Secondary));
        let repo = InMemoryRepository::from_roster(roster);
        let err = ScheduleGenerator::new(&repo)
            .generate(SchoolLevel::Secondary)
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRoster(_)));
    }

    #[test]
    fn test_no_double_booking_after_run() {
        let roster = school(6)
            .with_grade(
                Grade::new("9b", SchoolLevel::Secondary)
                    .with_name("9")
                    .with_section("B")
                    .with_student_count(30),
            )
            .with_curriculum("9b", "math")
            .with_teacher(
                Teacher::new("t2", SchoolLevel::Secondary).with_max_weekly_hours(10.0),
            )
            .with_qualification("t2", "math")
            .with_room(Room::new("r2").with_capacity(32));
        let repo = InMemoryRepository::from_roster(roster);
        generate(&repo, GeneratorConfig::default().with_seed(7));

        let committed = repo.assignments(&AssignmentFilter::default()).unwrap();
        for (i, a) in committed.iter().enumerate() {
            for b in &committed[i + 1..] {
                if a.time_block_id == b.time_block_id {
                    assert_ne!(a.teacher_id, b.teacher_id, "{} vs {}", a.id, b.id);
                    assert_ne!(a.room_id, b.room_id, "{} vs {}", a.id, b.id);
                    assert_ne!(a.grade_id, b.grade_id, "{} vs {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_committed_set_passes_validation() {
        let repo = InMemoryRepository::from_roster(school(4));
        generate(&repo, GeneratorConfig::default().with_seed(11));

        let roster = repo.roster(None).unwrap();
        let committed = repo.assignments(&AssignmentFilter::default()).unwrap();
        for a in &committed {
            let conflicts =
                validate_candidate(&roster, &committed, &a.candidate(), Some(&a.id)).unwrap();
            assert!(
                !conflicts.iter().any(|c| c.is_error()),
                "assignment {} carries errors: {conflicts:?}",
                a.id
            );
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let placements = |seed: u64| {
            let repo = InMemoryRepository::from_roster(school(5));
            generate(&repo, GeneratorConfig::default().with_seed(seed));
            let mut tuples: Vec<_> = repo
                .assignments(&AssignmentFilter::default())
                .unwrap()
                .into_iter()
                .map(|a| (a.teacher_id, a.grade_id, a.room_id, a.time_block_id))
                .collect();
            tuples.sort();
            tuples
        };

        assert_eq!(placements(42), placements(42));
    }

    #[test]
    fn test_regeneration_does_not_accumulate() {
        let repo = InMemoryRepository::from_roster(school(3));
        let first = generate(&repo, GeneratorConfig::default().with_seed(5));
        let second = generate(&repo, GeneratorConfig::default().with_seed(6));

        assert_eq!(first.assigned, 2);
        assert_eq!(second.assigned, 2);
        let committed = repo.assignments(&AssignmentFilter::default()).unwrap();
        assert_eq!(committed.len(), 2);
    }

    #[test]
    fn test_other_level_survives_regeneration() {
        let roster = school(3)
            .with_teacher(Teacher::new("tp", SchoolLevel::Primary))
            .with_subject(Subject::new("art", SchoolLevel::Primary))
            .with_grade(Grade::new("4b", SchoolLevel::Primary).with_student_count(20))
            .with_qualification("tp", "art")
            .with_curriculum("4b", "art");
        let repo = InMemoryRepository::from_roster(roster).with_assignment(Assignment::new(
            "pri-1",
            &AssignmentCandidate::new("tp", "art", "4b", "r1", "b0"),
        ));

        generate(&repo, GeneratorConfig::default().with_seed(2));

        let survivors = repo
            .assignments(&AssignmentFilter::default().with_grade("4b"))
            .unwrap();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, "pri-1");
    }

    #[test]
    fn test_cross_level_booking_blocks_shared_teacher() {
        // The only teacher already teaches the other level in the only
        // block, so nothing can be placed.
        let roster = Roster::new()
            .with_teacher(Teacher::new("t1", SchoolLevel::Both))
            .with_subject(Subject::new("math", SchoolLevel::Secondary))
            .with_subject(Subject::new("art", SchoolLevel::Primary))
            .with_grade(Grade::new("9a", SchoolLevel::Secondary).with_student_count(20))
            .with_grade(Grade::new("4b", SchoolLevel::Primary).with_student_count(20))
            .with_room(Room::new("r1"))
            .with_room(Room::new("r2"))
            .with_time_block(TimeBlock::new("b1", 1, SessionDuration::Sixty))
            .with_qualification("t1", "math")
            .with_qualification("t1", "art")
            .with_curriculum("9a", "math")
            .with_curriculum("4b", "art");
        let repo = InMemoryRepository::from_roster(roster).with_assignment(Assignment::new(
            "pri-1",
            &AssignmentCandidate::new("t1", "art", "4b", "r1", "b1"),
        ));

        let outcome = generate(&repo, GeneratorConfig::default().with_seed(9));
        assert_eq!(outcome.assigned, 0);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_greedy_strategy_fills_simple_case() {
        let repo = InMemoryRepository::from_roster(school(2));
        let outcome = generate(
            &repo,
            GeneratorConfig::default()
                .with_strategy(SearchStrategy::Greedy)
                .with_seed(1),
        );
        assert!(outcome.success);
        assert_eq!(outcome.assigned, 2);
    }

    #[test]
    fn test_zero_attempt_budget_reports_all_skipped() {
        let repo = InMemoryRepository::from_roster(school(2));
        let outcome = generate(
            &repo,
            GeneratorConfig::default().with_seed(1).with_attempt_budget(0),
        );
        assert_eq!(outcome.assigned, 0);
        assert_eq!(outcome.skipped, 2);
        assert!(!outcome.success);
        assert!(repo.assignments(&AssignmentFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_room_eligibility_pools_are_disjoint() {
        let generic = Subject::new("math", SchoolLevel::Secondary);
        let lab_subject = Subject::new("comp", SchoolLevel::Secondary).with_special_room("Computing");
        let grade = Grade::new("g", SchoolLevel::Secondary).with_student_count(20);
        let classroom = Room::new("r1").with_capacity(30);
        let lab = Room::new("lab").with_capacity(30).with_specialization("Computing");

        assert!(room_eligible(&generic, &grade, &classroom));
        assert!(!room_eligible(&generic, &grade, &lab));
        assert!(room_eligible(&lab_subject, &grade, &lab));
        assert!(!room_eligible(&lab_subject, &grade, &classroom));
    }

    #[test]
    fn test_room_eligibility_respects_caps() {
        let subject = Subject::new("comp", SchoolLevel::Secondary).with_special_room("Computing");
        let big_grade = Grade::new("g", SchoolLevel::Secondary).with_student_count(28);
        let lab = Room::new("lab")
            .with_capacity(30)
            .with_specialization("Computing")
            .with_max_students(25);

        assert!(!room_eligible(&subject, &big_grade, &lab));
    }

    #[test]
    fn test_block_eligibility() {
        let secondary = Grade::new("g", SchoolLevel::Secondary);
        let primary = Grade::new("p", SchoolLevel::Primary);
        let short = TimeBlock::new("b", 1, SessionDuration::Thirty);
        let long = TimeBlock::new("b", 1, SessionDuration::Sixty);

        assert!(!block_eligible(&secondary, &short));
        assert!(block_eligible(&secondary, &long));
        assert!(block_eligible(&primary, &short));
    }
}
