//! Greedy single-pass placement.
//!
//! Time blocks and rooms are shuffled once, requirements are walked in
//! roster order, and the first legal (teacher, room) pair for each
//! (requirement, block) wins. Commitments are final — the pass never
//! reconsiders, so an early pick can starve a later requirement that
//! had fewer alternatives. O(requirements × blocks × teachers) with the
//! occupancy map answering the double-booking questions in O(1).

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::occupancy::OccupancyMap;
use super::requirements::Requirement;
use super::{block_eligible, room_eligible, GeneratorError, SearchResult};
use crate::models::{
    Assignment, AssignmentCandidate, Room, Roster, SchoolLevel, Teacher, TimeBlock,
};
use crate::validation::validate_candidate;

pub(crate) fn fill<R: Rng>(
    roster: &Roster,
    requirements: &[Requirement],
    fixed: &[Assignment],
    level: SchoolLevel,
    rng: &mut R,
) -> Result<SearchResult, GeneratorError> {
    let mut occupancy = OccupancyMap::from_assignments(fixed, roster);
    let mut working: Vec<Assignment> = fixed.to_vec();
    let staged_from = working.len();

    let mut blocks: Vec<&TimeBlock> = roster.class_blocks(level);
    blocks.shuffle(rng);
    let mut rooms: Vec<&Room> = roster.rooms.iter().collect();
    rooms.shuffle(rng);

    let mut assigned = 0usize;
    let mut skipped = 0usize;

    for requirement in requirements {
        let (Some(subject), Some(grade)) = (
            roster.subject(&requirement.subject_id),
            roster.grade(&requirement.grade_id),
        ) else {
            skipped += requirement.occurrences;
            continue;
        };

        let mut teachers: Vec<&Teacher> = roster.qualified_teachers(&subject.id);
        if teachers.is_empty() {
            warn!(
                subject = %subject.name,
                grade = %grade.label(),
                occurrences = requirement.occurrences,
                "no qualified teacher; requirement skipped"
            );
            skipped += requirement.occurrences;
            continue;
        }
        teachers.shuffle(rng);

        let mut placed = 0usize;
        for block in &blocks {
            if placed >= requirement.occurrences {
                break;
            }
            if !occupancy.grade_free(&grade.id, &block.id) || !block_eligible(grade, block) {
                continue;
            }

            let Some(teacher) = teachers.iter().find(|t| {
                occupancy.teacher_free(&t.id, &block.id)
                    && occupancy.teacher_hours(&t.id) + block.duration.hours()
                        <= t.max_weekly_hours
            }) else {
                continue;
            };

            let Some(room) = rooms.iter().find(|r| {
                occupancy.room_free(&r.id, &block.id) && room_eligible(subject, grade, r)
            }) else {
                continue;
            };

            let candidate =
                AssignmentCandidate::new(&teacher.id, &subject.id, &grade.id, &room.id, &block.id);
            let conflicts = validate_candidate(roster, &working, &candidate, None)?;
            if conflicts.iter().any(|c| c.is_error()) {
                debug!(block = %block.id, "validator rejected pre-filtered candidate");
                continue;
            }

            occupancy.occupy(&teacher.id, &room.id, &grade.id, &block.id, block.duration.hours());
            let id = format!("auto-{}-{}", grade.id, block.id);
            working.push(Assignment::new(id, &candidate).with_conflicts(conflicts));
            placed += 1;
            assigned += 1;
        }

        if placed < requirement.occurrences {
            skipped += requirement.occurrences - placed;
        }
    }

    let assignments = working.split_off(staged_from);
    Ok(SearchResult {
        assignments,
        assigned,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::generator::extract_requirements;
    use crate::models::{Grade, SessionDuration, Subject};

    fn lab_roster() -> Roster {
        Roster::new()
            .with_teacher(Teacher::new("t1", SchoolLevel::Secondary).with_max_weekly_hours(10.0))
            .with_subject(
                Subject::new("comp", SchoolLevel::Secondary)
                    .with_name("Computing")
                    .with_weekly_frequency(2)
                    .with_special_room("Computing"),
            )
            .with_grade(Grade::new("9a", SchoolLevel::Secondary).with_student_count(24))
            .with_room(Room::new("r1").with_capacity(35))
            .with_room(
                Room::new("lab")
                    .with_capacity(30)
                    .with_specialization("Computing")
                    .with_max_students(25),
            )
            .with_time_block(TimeBlock::new("b1", 1, SessionDuration::Sixty))
            .with_time_block(TimeBlock::new("b2", 2, SessionDuration::Sixty))
            .with_qualification("t1", "comp")
            .with_curriculum("9a", "comp")
    }

    #[test]
    fn test_specialized_subject_lands_in_matching_room() {
        let roster = lab_roster();
        let requirements = extract_requirements(&roster);
        let mut rng = SmallRng::seed_from_u64(42);

        let result = fill(&roster, &requirements, &[], SchoolLevel::Secondary, &mut rng).unwrap();
        assert_eq!(result.assigned, 2);
        for a in &result.assignments {
            assert_eq!(a.room_id, "lab");
        }
    }

    #[test]
    fn test_generic_subject_never_takes_lab() {
        // Only a specialized room exists, so a generic subject cannot
        // be placed at all.
        let roster = Roster::new()
            .with_teacher(Teacher::new("t1", SchoolLevel::Secondary))
            .with_subject(Subject::new("math", SchoolLevel::Secondary).with_weekly_frequency(1))
            .with_grade(Grade::new("9a", SchoolLevel::Secondary).with_student_count(20))
            .with_room(Room::new("lab").with_specialization("Computing"))
            .with_time_block(TimeBlock::new("b1", 1, SessionDuration::Sixty))
            .with_qualification("t1", "math")
            .with_curriculum("9a", "math");
        let requirements = extract_requirements(&roster);
        let mut rng = SmallRng::seed_from_u64(42);

        let result = fill(&roster, &requirements, &[], SchoolLevel::Secondary, &mut rng).unwrap();
        assert_eq!(result.assigned, 0);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_hour_budget_limits_one_teacher() {
        // Budget 1.0h, two occurrences wanted: only one fits.
        let mut roster = lab_roster();
        roster.teachers[0].max_weekly_hours = 1.0;
        let requirements = extract_requirements(&roster);
        let mut rng = SmallRng::seed_from_u64(42);

        let result = fill(&roster, &requirements, &[], SchoolLevel::Secondary, &mut rng).unwrap();
        assert_eq!(result.assigned, 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_fixed_assignments_not_returned() {
        let roster = lab_roster();
        let fixed = vec![Assignment::new(
            "other-level",
            &AssignmentCandidate::new("t9", "s9", "g9", "r9", "b9"),
        )];
        let requirements = extract_requirements(&roster);
        let mut rng = SmallRng::seed_from_u64(42);

        let result =
            fill(&roster, &requirements, &fixed, SchoolLevel::Secondary, &mut rng).unwrap();
        assert!(result.assignments.iter().all(|a| a.id != "other-level"));
        assert_eq!(result.assigned, result.assignments.len());
    }
}
