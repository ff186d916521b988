//! Storage abstraction.
//!
//! The core never talks to a concrete database: it consumes
//! [`ScheduleRepository`], which hands out roster snapshots and owns
//! every mutation of the committed assignment set. Implementations must
//! make each mutation atomic — in particular [`replace_level`]
//! (reset-and-fill for one school level) must never be observable
//! half-applied.
//!
//! [`InMemoryRepository`] is the reference backend used by tests and
//! development setups; its single mutation lock is also the point where
//! concurrent commit decisions are serialized.
//!
//! [`replace_level`]: ScheduleRepository::replace_level

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::models::{Assignment, Roster, SchoolLevel};

/// Storage failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The targeted record does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    /// An assignment with the same ID is already committed.
    #[error("assignment '{0}' already exists")]
    DuplicateAssignment(String),
    /// Backend-specific failure.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Query filter over committed assignments.
///
/// Every set field must match; the default filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct AssignmentFilter {
    pub teacher_id: Option<String>,
    pub grade_id: Option<String>,
    pub room_id: Option<String>,
    pub time_block_id: Option<String>,
}

impl AssignmentFilter {
    /// Restricts to one teacher.
    pub fn with_teacher(mut self, id: impl Into<String>) -> Self {
        self.teacher_id = Some(id.into());
        self
    }

    /// Restricts to one grade.
    pub fn with_grade(mut self, id: impl Into<String>) -> Self {
        self.grade_id = Some(id.into());
        self
    }

    /// Restricts to one room.
    pub fn with_room(mut self, id: impl Into<String>) -> Self {
        self.room_id = Some(id.into());
        self
    }

    /// Restricts to one time block.
    pub fn with_time_block(mut self, id: impl Into<String>) -> Self {
        self.time_block_id = Some(id.into());
        self
    }

    /// Whether an assignment matches the filter.
    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.teacher_id
            .as_ref()
            .is_none_or(|id| *id == assignment.teacher_id)
            && self
                .grade_id
                .as_ref()
                .is_none_or(|id| *id == assignment.grade_id)
            && self
                .room_id
                .as_ref()
                .is_none_or(|id| *id == assignment.room_id)
            && self
                .time_block_id
                .as_ref()
                .is_none_or(|id| *id == assignment.time_block_id)
    }
}

/// Transactional access to roster entities and committed assignments.
pub trait ScheduleRepository {
    /// Entity snapshot.
    ///
    /// With a level scope: teachers of that level or `Both`, grades of
    /// exactly that level, all rooms, and links restricted to in-scope
    /// entities. Time blocks are always returned in full so hour
    /// accounting can resolve any committed assignment's duration.
    fn roster(&self, scope: Option<SchoolLevel>) -> Result<Roster, RepositoryError>;

    /// Committed assignments matching the filter.
    fn assignments(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>, RepositoryError>;

    /// Commits a new assignment (with its conflict list).
    fn create_assignment(&self, assignment: Assignment) -> Result<(), RepositoryError>;

    /// Replaces an existing assignment wholesale, conflicts included.
    fn update_assignment(&self, assignment: Assignment) -> Result<(), RepositoryError>;

    /// Deletes one assignment by ID.
    fn delete_assignment(&self, id: &str) -> Result<(), RepositoryError>;

    /// Atomically replaces every assignment belonging to the level's
    /// grades with the given set. This is the reset-and-fill boundary:
    /// a reader sees either the old generation or the new one, never a
    /// mix. An empty set clears the level.
    fn replace_level(
        &self,
        level: SchoolLevel,
        assignments: Vec<Assignment>,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, Default)]
struct Store {
    roster: Roster,
    assignments: Vec<Assignment>,
}

/// In-memory reference backend.
///
/// All operations run under one mutex, which makes every mutation
/// atomic and serializes commit decisions between concurrent callers.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    inner: Mutex<Store>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the given roster.
    pub fn from_roster(roster: Roster) -> Self {
        Self {
            inner: Mutex::new(Store {
                roster,
                assignments: Vec::new(),
            }),
        }
    }

    /// Seeds a committed assignment (test/bootstrap helper).
    pub fn with_assignment(self, assignment: Assignment) -> Self {
        self.inner.lock().assignments.push(assignment);
        self
    }

    fn scoped_roster(full: &Roster, level: SchoolLevel) -> Roster {
        let teachers: Vec<_> = full
            .teachers
            .iter()
            .filter(|t| t.level.applies_to(level))
            .cloned()
            .collect();
        let grades: Vec<_> = full
            .grades
            .iter()
            .filter(|g| g.level == level)
            .cloned()
            .collect();

        let teacher_subjects = full
            .teacher_subjects
            .iter()
            .filter(|link| teachers.iter().any(|t| t.id == link.teacher_id))
            .cloned()
            .collect();
        let grade_subjects = full
            .grade_subjects
            .iter()
            .filter(|link| grades.iter().any(|g| g.id == link.grade_id))
            .cloned()
            .collect();

        Roster {
            teachers,
            subjects: full.subjects.clone(),
            grades,
            rooms: full.rooms.clone(),
            time_blocks: full.time_blocks.clone(),
            teacher_subjects,
            grade_subjects,
        }
    }
}

impl ScheduleRepository for InMemoryRepository {
    fn roster(&self, scope: Option<SchoolLevel>) -> Result<Roster, RepositoryError> {
        let store = self.inner.lock();
        Ok(match scope {
            None | Some(SchoolLevel::Both) => store.roster.clone(),
            Some(level) => Self::scoped_roster(&store.roster, level),
        })
    }

    fn assignments(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>, RepositoryError> {
        let store = self.inner.lock();
        Ok(store
            .assignments
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn create_assignment(&self, assignment: Assignment) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock();
        if store.assignments.iter().any(|a| a.id == assignment.id) {
            return Err(RepositoryError::DuplicateAssignment(assignment.id));
        }
        store.assignments.push(assignment);
        Ok(())
    }

    fn update_assignment(&self, assignment: Assignment) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock();
        match store.assignments.iter_mut().find(|a| a.id == assignment.id) {
            Some(slot) => {
                *slot = assignment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                entity: "assignment",
                id: assignment.id,
            }),
        }
    }

    fn delete_assignment(&self, id: &str) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock();
        let before = store.assignments.len();
        store.assignments.retain(|a| a.id != id);
        if store.assignments.len() == before {
            return Err(RepositoryError::NotFound {
                entity: "assignment",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn replace_level(
        &self,
        level: SchoolLevel,
        assignments: Vec<Assignment>,
    ) -> Result<(), RepositoryError> {
        let mut store = self.inner.lock();

        for (i, a) in assignments.iter().enumerate() {
            if assignments[..i].iter().any(|other| other.id == a.id) {
                return Err(RepositoryError::DuplicateAssignment(a.id.clone()));
            }
        }

        let level_grades: Vec<String> = store
            .roster
            .grades
            .iter()
            .filter(|g| g.level == level)
            .map(|g| g.id.clone())
            .collect();

        // All checks run before any mutation so a failure leaves the
        // store untouched.
        if let Some(dup) = assignments.iter().find(|a| {
            store
                .assignments
                .iter()
                .any(|kept| !level_grades.contains(&kept.grade_id) && kept.id == a.id)
        }) {
            return Err(RepositoryError::DuplicateAssignment(dup.id.clone()));
        }

        let before = store.assignments.len();
        store
            .assignments
            .retain(|a| !level_grades.contains(&a.grade_id));
        let cleared = before - store.assignments.len();

        debug!(?level, cleared, installed = assignments.len(), "replaced level assignments");
        store.assignments.extend(assignments);
        Ok(())
    }
}
