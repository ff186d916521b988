//! Depth-first placement with undo.
//!
//! The requirement list is expanded into individual occurrences, placed
//! one at a time. When no legal (block, teacher, room) remains for the
//! current occurrence, the most recent placement is undone and its next
//! alternative tried — the search explores the combination space until
//! every occurrence is placed or the space is exhausted. Candidate
//! order is re-shuffled per occurrence so repeated runs do not fail in
//! identical patterns.
//!
//! Exhaustive search over a realistic roster is not tractable, so total
//! work is bounded by an attempt budget; on cutoff the deepest partial
//! solution seen is reported instead of hanging.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern
//! Approach", Ch. 6.3: Backtracking Search for CSPs

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::occupancy::OccupancyMap;
use super::requirements::Requirement;
use super::{block_eligible, room_eligible, GeneratorError, SearchResult};
use crate::models::{
    Assignment, AssignmentCandidate, Grade, Room, Roster, SchoolLevel, Subject, TimeBlock,
};
use crate::validation::validate_candidate;

/// One session still to place.
struct Occurrence<'a> {
    grade: &'a Grade,
    subject: &'a Subject,
}

pub(crate) fn fill<R: Rng>(
    roster: &Roster,
    requirements: &[Requirement],
    fixed: &[Assignment],
    level: SchoolLevel,
    rng: &mut R,
    attempt_budget: usize,
) -> Result<SearchResult, GeneratorError> {
    let mut occupancy = OccupancyMap::from_assignments(fixed, roster);
    let mut working: Vec<Assignment> = fixed.to_vec();
    let staged_from = working.len();

    // Occurrences that can never be placed are excluded up front, so
    // the search does not burn budget on them.
    let mut skipped_upfront = 0usize;
    let mut occurrences: Vec<Occurrence> = Vec::new();
    for requirement in requirements {
        let (Some(subject), Some(grade)) = (
            roster.subject(&requirement.subject_id),
            roster.grade(&requirement.grade_id),
        ) else {
            skipped_upfront += requirement.occurrences;
            continue;
        };
        if roster.qualified_teachers(&subject.id).is_empty() {
            warn!(
                subject = %subject.name,
                grade = %grade.label(),
                occurrences = requirement.occurrences,
                "no qualified teacher; requirement skipped"
            );
            skipped_upfront += requirement.occurrences;
            continue;
        }
        for _ in 0..requirement.occurrences {
            occurrences.push(Occurrence { grade, subject });
        }
    }

    let blocks = roster.class_blocks(level);
    let mut search = Search {
        roster,
        blocks: &blocks,
        rng,
        budget: attempt_budget,
        attempts: 0,
        best: Vec::new(),
    };

    let complete = search.place(&occurrences, 0, &mut occupancy, &mut working, staged_from)?;
    if !complete {
        debug!(
            attempts = search.attempts,
            placed = search.best.len(),
            wanted = occurrences.len(),
            "search exhausted or cut off; keeping deepest partial solution"
        );
    }

    let assignments = if complete {
        working.split_off(staged_from)
    } else {
        search.best
    };
    let assigned = assignments.len();
    let skipped = skipped_upfront + occurrences.len() - assigned;
    Ok(SearchResult {
        assignments,
        assigned,
        skipped,
    })
}

struct Search<'a, R: Rng> {
    roster: &'a Roster,
    blocks: &'a [&'a TimeBlock],
    rng: &'a mut R,
    budget: usize,
    attempts: usize,
    /// Deepest staged prefix seen, kept in case the search never
    /// completes.
    best: Vec<Assignment>,
}

impl<R: Rng> Search<'_, R> {
    /// Tries to place `occurrences[depth..]`. Returns `Ok(true)` on a
    /// complete placement, `Ok(false)` when this branch (or the whole
    /// budget) is exhausted.
    fn place(
        &mut self,
        occurrences: &[Occurrence<'_>],
        depth: usize,
        occupancy: &mut OccupancyMap,
        working: &mut Vec<Assignment>,
        staged_from: usize,
    ) -> Result<bool, GeneratorError> {
        if depth == occurrences.len() {
            return Ok(true);
        }
        let occurrence = &occurrences[depth];

        // Fresh shuffles per occurrence keep failure patterns from
        // repeating across attempts.
        let mut blocks = self.blocks.to_vec();
        blocks.shuffle(self.rng);
        let mut teachers = self.roster.qualified_teachers(&occurrence.subject.id);
        teachers.shuffle(self.rng);
        let mut rooms: Vec<&Room> = self.roster.rooms.iter().collect();
        rooms.shuffle(self.rng);

        for block in &blocks {
            if !occupancy.grade_free(&occurrence.grade.id, &block.id)
                || !block_eligible(occurrence.grade, block)
            {
                continue;
            }
            for teacher in &teachers {
                if !occupancy.teacher_free(&teacher.id, &block.id)
                    || occupancy.teacher_hours(&teacher.id) + block.duration.hours()
                        > teacher.max_weekly_hours
                {
                    continue;
                }
                for room in &rooms {
                    if !occupancy.room_free(&room.id, &block.id)
                        || !room_eligible(occurrence.subject, occurrence.grade, room)
                    {
                        continue;
                    }
                    if self.attempts >= self.budget {
                        return Ok(false);
                    }
                    self.attempts += 1;

                    let candidate = AssignmentCandidate::new(
                        &teacher.id,
                        &occurrence.subject.id,
                        &occurrence.grade.id,
                        &room.id,
                        &block.id,
                    );
                    let conflicts = validate_candidate(self.roster, working, &candidate, None)?;
                    if conflicts.iter().any(|c| c.is_error()) {
                        continue;
                    }

                    let hours = block.duration.hours();
                    occupancy.occupy(&teacher.id, &room.id, &occurrence.grade.id, &block.id, hours);
                    let id = format!("auto-{}-{}", occurrence.grade.id, block.id);
                    working.push(Assignment::new(id, &candidate).with_conflicts(conflicts));

                    let placed = working.len() - staged_from;
                    if placed > self.best.len() {
                        self.best = working[staged_from..].to_vec();
                    }

                    if self.place(occurrences, depth + 1, occupancy, working, staged_from)? {
                        return Ok(true);
                    }

                    // Dead end below: undo and try the next alternative.
                    working.pop();
                    occupancy.release(
                        &teacher.id,
                        &room.id,
                        &occurrence.grade.id,
                        &block.id,
                        hours,
                    );

                    if self.attempts >= self.budget {
                        return Ok(false);
                    }
                }
            }
        }

        Ok(false)
    }
}
