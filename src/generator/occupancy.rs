//! Occupancy bookkeeping for the search.
//!
//! Arena-style: one map is owned by one generation run and threaded
//! through the search call chain, so repeated runs cannot leak state
//! into each other. Three resource×block key sets answer the
//! double-booking questions in O(1); the hours map carries each
//! teacher's committed duration-hours using the same mapping the
//! validator uses.

use std::collections::{HashMap, HashSet};

use crate::models::{Assignment, Roster};

/// Tracks which (resource, block) pairs are taken and how many weekly
/// hours each teacher has accumulated.
#[derive(Debug, Clone, Default)]
pub struct OccupancyMap {
    teacher_blocks: HashSet<(String, String)>,
    room_blocks: HashSet<(String, String)>,
    grade_blocks: HashSet<(String, String)>,
    teacher_hours: HashMap<String, f64>,
}

fn key(resource_id: &str, block_id: &str) -> (String, String) {
    (resource_id.to_string(), block_id.to_string())
}

impl OccupancyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the map from already-committed assignments — typically the
    /// other level's records that survive a reset. Hours resolve
    /// through the roster's block table; an assignment whose block is
    /// unknown contributes occupancy but no hours.
    pub fn from_assignments(assignments: &[Assignment], roster: &Roster) -> Self {
        let mut map = Self::new();
        for a in assignments {
            let hours = roster
                .time_block(&a.time_block_id)
                .map(|b| b.duration.hours())
                .unwrap_or(0.0);
            map.occupy(&a.teacher_id, &a.room_id, &a.grade_id, &a.time_block_id, hours);
        }
        map
    }

    /// Whether the teacher is free in the block.
    pub fn teacher_free(&self, teacher_id: &str, block_id: &str) -> bool {
        !self.teacher_blocks.contains(&key(teacher_id, block_id))
    }

    /// Whether the room is free in the block.
    pub fn room_free(&self, room_id: &str, block_id: &str) -> bool {
        !self.room_blocks.contains(&key(room_id, block_id))
    }

    /// Whether the grade is free in the block.
    pub fn grade_free(&self, grade_id: &str, block_id: &str) -> bool {
        !self.grade_blocks.contains(&key(grade_id, block_id))
    }

    /// Accumulated weekly hours for a teacher.
    pub fn teacher_hours(&self, teacher_id: &str) -> f64 {
        self.teacher_hours.get(teacher_id).copied().unwrap_or(0.0)
    }

    /// Records a placement.
    pub fn occupy(
        &mut self,
        teacher_id: &str,
        room_id: &str,
        grade_id: &str,
        block_id: &str,
        hours: f64,
    ) {
        self.teacher_blocks.insert(key(teacher_id, block_id));
        self.room_blocks.insert(key(room_id, block_id));
        self.grade_blocks.insert(key(grade_id, block_id));
        *self.teacher_hours.entry(teacher_id.to_string()).or_insert(0.0) += hours;
    }

    /// Undoes a placement. Exact inverse of [`occupy`](Self::occupy)
    /// with the same arguments.
    pub fn release(
        &mut self,
        teacher_id: &str,
        room_id: &str,
        grade_id: &str,
        block_id: &str,
        hours: f64,
    ) {
        self.teacher_blocks.remove(&key(teacher_id, block_id));
        self.room_blocks.remove(&key(room_id, block_id));
        self.grade_blocks.remove(&key(grade_id, block_id));
        if let Some(total) = self.teacher_hours.get_mut(teacher_id) {
            *total -= hours;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AssignmentCandidate, Grade, Room, SchoolLevel, SessionDuration, Subject, Teacher,
        TimeBlock,
    };

    #[test]
    fn test_occupy_and_query() {
        let mut map = OccupancyMap::new();
        assert!(map.teacher_free("t1", "b1"));

        map.occupy("t1", "r1", "g1", "b1", 1.0);
        assert!(!map.teacher_free("t1", "b1"));
        assert!(!map.room_free("r1", "b1"));
        assert!(!map.grade_free("g1", "b1"));
        assert!(map.teacher_free("t1", "b2"));
        assert!((map.teacher_hours("t1") - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_release_is_exact_inverse() {
        let mut map = OccupancyMap::new();
        map.occupy("t1", "r1", "g1", "b1", 0.75);
        map.release("t1", "r1", "g1", "b1", 0.75);

        assert!(map.teacher_free("t1", "b1"));
        assert!(map.room_free("r1", "b1"));
        assert!(map.grade_free("g1", "b1"));
        assert!(map.teacher_hours("t1").abs() < 1e-10);
    }

    #[test]
    fn test_hours_accumulate() {
        let mut map = OccupancyMap::new();
        map.occupy("t1", "r1", "g1", "b1", 1.0);
        map.occupy("t1", "r1", "g1", "b2", 0.5);
        assert!((map.teacher_hours("t1") - 1.5).abs() < 1e-10);
        assert!(map.teacher_hours("t2").abs() < 1e-10);
    }

    #[test]
    fn test_seed_from_assignments() {
        let roster = Roster::new()
            .with_teacher(Teacher::new("t1", SchoolLevel::Primary))
            .with_subject(Subject::new("s1", SchoolLevel::Primary))
            .with_grade(Grade::new("g1", SchoolLevel::Primary))
            .with_room(Room::new("r1"))
            .with_time_block(TimeBlock::new("b1", 1, SessionDuration::FortyFive));
        let committed = vec![crate::models::Assignment::new(
            "a1",
            &AssignmentCandidate::new("t1", "s1", "g1", "r1", "b1"),
        )];

        let map = OccupancyMap::from_assignments(&committed, &roster);
        assert!(!map.teacher_free("t1", "b1"));
        assert!(!map.grade_free("g1", "b1"));
        assert!((map.teacher_hours("t1") - 0.75).abs() < 1e-10);
    }
}
