//! Roster snapshot.
//!
//! The entity universe one validation or generation pass operates over:
//! teachers, subjects, grades, rooms, time blocks and the two link
//! tables. A roster is assembled by the repository (scoped to a school
//! level for generation, unscoped for validation) and is read-only from
//! then on — both consumers treat it as a consistent snapshot.

use serde::{Deserialize, Serialize};

use super::{
    Grade, GradeSubject, Room, SchoolLevel, Subject, Teacher, TeacherSubject, TimeBlock,
};

/// Entity snapshot for validation and generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub grades: Vec<Grade>,
    pub rooms: Vec<Room>,
    pub time_blocks: Vec<TimeBlock>,
    /// Teacher qualification links.
    pub teacher_subjects: Vec<TeacherSubject>,
    /// Grade curriculum links.
    pub grade_subjects: Vec<GradeSubject>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a grade.
    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grades.push(grade);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a time block.
    pub fn with_time_block(mut self, block: TimeBlock) -> Self {
        self.time_blocks.push(block);
        self
    }

    /// Adds a teacher qualification link.
    pub fn with_qualification(
        mut self,
        teacher_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        self.teacher_subjects
            .push(TeacherSubject::new(teacher_id, subject_id));
        self
    }

    /// Adds a grade curriculum link.
    pub fn with_curriculum(
        mut self,
        grade_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        self.grade_subjects
            .push(GradeSubject::new(grade_id, subject_id));
        self
    }

    /// Finds a teacher by id.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Finds a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Finds a grade by id.
    pub fn grade(&self, id: &str) -> Option<&Grade> {
        self.grades.iter().find(|g| g.id == id)
    }

    /// Finds a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Finds a time block by id.
    pub fn time_block(&self, id: &str) -> Option<&TimeBlock> {
        self.time_blocks.iter().find(|b| b.id == id)
    }

    /// Teachers qualified for a subject, in roster order.
    pub fn qualified_teachers(&self, subject_id: &str) -> Vec<&Teacher> {
        self.teacher_subjects
            .iter()
            .filter(|link| link.subject_id == subject_id)
            .filter_map(|link| self.teacher(&link.teacher_id))
            .collect()
    }

    /// Subjects on a grade's curriculum. Dangling links are skipped.
    pub fn subjects_for_grade(&self, grade_id: &str) -> Vec<&Subject> {
        self.grade_subjects
            .iter()
            .filter(|link| link.grade_id == grade_id)
            .filter_map(|link| self.subject(&link.subject_id))
            .collect()
    }

    /// Assignable blocks in scope for a level: class-type blocks whose
    /// tier applies to `level`.
    pub fn class_blocks(&self, level: SchoolLevel) -> Vec<&TimeBlock> {
        self.time_blocks
            .iter()
            .filter(|b| b.is_assignable() && b.level.applies_to(level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockType, SessionDuration};

    fn sample_roster() -> Roster {
        Roster::new()
            .with_teacher(Teacher::new("t1", SchoolLevel::Secondary).with_name("Ada"))
            .with_teacher(Teacher::new("t2", SchoolLevel::Both).with_name("Grace"))
            .with_subject(Subject::new("s1", SchoolLevel::Secondary).with_name("Mathematics"))
            .with_subject(Subject::new("s2", SchoolLevel::Both).with_name("Computing"))
            .with_grade(Grade::new("g1", SchoolLevel::Secondary).with_name("9").with_section("A"))
            .with_room(Room::new("r1"))
            .with_time_block(TimeBlock::new("b1", 1, SessionDuration::Sixty))
            .with_time_block(
                TimeBlock::new("b2", 1, SessionDuration::Thirty)
                    .with_block_type(BlockType::Break),
            )
            .with_time_block(
                TimeBlock::new("b3", 2, SessionDuration::Sixty)
                    .with_level(SchoolLevel::Primary),
            )
            .with_qualification("t1", "s1")
            .with_qualification("t2", "s1")
            .with_qualification("t2", "s2")
            .with_curriculum("g1", "s1")
            .with_curriculum("g1", "s2")
    }

    #[test]
    fn test_lookups() {
        let roster = sample_roster();
        assert_eq!(roster.teacher("t1").unwrap().name, "Ada");
        assert_eq!(roster.subject("s2").unwrap().name, "Computing");
        assert!(roster.teacher("missing").is_none());
        assert!(roster.time_block("b3").is_some());
    }

    #[test]
    fn test_qualified_teachers() {
        let roster = sample_roster();
        let for_math = roster.qualified_teachers("s1");
        assert_eq!(for_math.len(), 2);

        let for_computing = roster.qualified_teachers("s2");
        assert_eq!(for_computing.len(), 1);
        assert_eq!(for_computing[0].id, "t2");

        assert!(roster.qualified_teachers("s99").is_empty());
    }

    #[test]
    fn test_subjects_for_grade() {
        let roster = sample_roster();
        let subjects = roster.subjects_for_grade("g1");
        assert_eq!(subjects.len(), 2);
    }

    #[test]
    fn test_subjects_for_grade_skips_dangling() {
        let roster = sample_roster().with_curriculum("g1", "missing");
        assert_eq!(roster.subjects_for_grade("g1").len(), 2);
    }

    #[test]
    fn test_class_blocks_filters_type_and_level() {
        let roster = sample_roster();
        // b2 is a break, b3 belongs to the primary tier.
        let blocks = roster.class_blocks(SchoolLevel::Secondary);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, "b1");

        let primary = roster.class_blocks(SchoolLevel::Primary);
        assert_eq!(primary.len(), 2);
    }
}
