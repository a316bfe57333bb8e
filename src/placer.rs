use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::{
    Assignment, Classroom, Faculty, FacultyId, Schedule, SessionDemand, Subject, SubjectId,
    TimeSlot,
};
use crate::resources::ResourceState;

/// Placement strategy selected by the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Greedy,
    Randomized,
}

/// Read-only inputs shared by every candidate run: the slot grid and
/// the resource snapshot, indexed for lookup.
pub struct PlacementContext<'a> {
    pub grid: &'a [TimeSlot],
    pub subjects: HashMap<&'a SubjectId, &'a Subject>,
    pub faculty: HashMap<&'a FacultyId, &'a Faculty>,
    /// Input order; this is the deterministic classroom scan order.
    pub classrooms: &'a [Classroom],
}

impl<'a> PlacementContext<'a> {
    pub fn new(
        grid: &'a [TimeSlot],
        subjects: &'a [Subject],
        faculty: &'a [Faculty],
        classrooms: &'a [Classroom],
    ) -> Self {
        Self {
            grid,
            subjects: subjects.iter().map(|s| (&s.id, s)).collect(),
            faculty: faculty.iter().map(|f| (&f.id, f)).collect(),
            classrooms,
        }
    }
}

/// A placement heuristic. `place_one` commits at most one session per
/// call; `begin_candidate` lets a strategy re-draw its scan order
/// between candidate runs.
pub trait Solver {
    fn begin_candidate(&mut self, _index: usize, _ctx: &PlacementContext<'_>) {}

    /// Returns true when one session was committed (schedule and
    /// resource state updated), false when no legal slot exists.
    fn place_one(
        &mut self,
        demand: &SessionDemand,
        ctx: &PlacementContext<'_>,
        schedule: &mut Schedule,
        state: &mut ResourceState,
    ) -> bool;
}

/// First-fit in grid scan order, no backtracking. An early unfortunate
/// placement can starve a later demand; that is the accepted limitation
/// of this heuristic.
#[derive(Debug, Default)]
pub struct GreedyFirstFit {
    slot_order: Vec<usize>,
    room_order: Vec<usize>,
}

impl Solver for GreedyFirstFit {
    fn begin_candidate(&mut self, _index: usize, ctx: &PlacementContext<'_>) {
        self.slot_order = (0..ctx.grid.len()).collect();
        self.room_order = (0..ctx.classrooms.len()).collect();
    }

    fn place_one(
        &mut self,
        demand: &SessionDemand,
        ctx: &PlacementContext<'_>,
        schedule: &mut Schedule,
        state: &mut ResourceState,
    ) -> bool {
        first_fit(demand, ctx, schedule, state, &self.slot_order, &self.room_order)
    }
}

/// Same first-fit checks as [`GreedyFirstFit`], but slot and classroom
/// scan orders are shuffled per candidate with a seeded rng, so
/// requesting several options yields genuinely distinct timetables
/// while staying reproducible for a given seed.
#[derive(Debug)]
pub struct RandomizedFirstFit {
    rng: StdRng,
    slot_order: Vec<usize>,
    room_order: Vec<usize>,
}

impl RandomizedFirstFit {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            slot_order: Vec::new(),
            room_order: Vec::new(),
        }
    }
}

impl Solver for RandomizedFirstFit {
    fn begin_candidate(&mut self, _index: usize, ctx: &PlacementContext<'_>) {
        self.slot_order = (0..ctx.grid.len()).collect();
        self.room_order = (0..ctx.classrooms.len()).collect();
        self.slot_order.shuffle(&mut self.rng);
        self.room_order.shuffle(&mut self.rng);
    }

    fn place_one(
        &mut self,
        demand: &SessionDemand,
        ctx: &PlacementContext<'_>,
        schedule: &mut Schedule,
        state: &mut ResourceState,
    ) -> bool {
        first_fit(demand, ctx, schedule, state, &self.slot_order, &self.room_order)
    }
}

pub fn make_solver(strategy: Strategy, seed: u64) -> Box<dyn Solver> {
    match strategy {
        Strategy::Greedy => Box::new(GreedyFirstFit::default()),
        Strategy::Randomized => Box::new(RandomizedFirstFit::new(seed)),
    }
}

// The shared first-fit core. Faculty occupancy is checked against the
// resource state by (slot, faculty), never inferred from schedule slot
// occupancy, since a slot may hold one assignment per classroom.
fn first_fit(
    demand: &SessionDemand,
    ctx: &PlacementContext<'_>,
    schedule: &mut Schedule,
    state: &mut ResourceState,
    slot_order: &[usize],
    room_order: &[usize],
) -> bool {
    // unassigned or unknown faculty makes the demand unsatisfiable
    let Some(faculty_id) = demand.faculty_id.as_ref() else {
        return false;
    };
    let Some(faculty) = ctx.faculty.get(faculty_id) else {
        return false;
    };
    let Some(subject) = ctx.subjects.get(&demand.subject_id) else {
        return false;
    };
    if state.assigned_count(faculty_id) >= faculty.weekly_cap() {
        return false;
    }
    if !faculty.qualified_for(&demand.subject_id) {
        return false;
    }

    let needed_capacity = subject.expected_students();
    for &slot_idx in slot_order {
        let slot = &ctx.grid[slot_idx];
        let key = slot.key();
        if state.faculty_booked(faculty_id, key) {
            continue;
        }
        for &room_idx in room_order {
            let room = &ctx.classrooms[room_idx];
            if room.capacity < needed_capacity {
                continue;
            }
            if state.classroom_booked(&room.id, key) || schedule.contains(key, &room.id) {
                continue;
            }
            schedule.insert(Assignment {
                slot: slot.clone(),
                subject_id: demand.subject_id.clone(),
                faculty_id: faculty_id.clone(),
                classroom_id: room.id.clone(),
                fixed: false,
            });
            state.book_classroom(&room.id, key);
            state.book_faculty(faculty_id, key);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Day;
    use crate::grid;

    fn subject(id: &str, faculty: Option<&str>, max_students: Option<u32>) -> Subject {
        Subject {
            id: id.into(),
            name: String::new(),
            teaching_hours: None,
            faculty_assigned: faculty.map(Into::into),
            max_students,
        }
    }

    fn faculty(id: &str, cap: Option<u32>, subjects: &[&str]) -> Faculty {
        Faculty {
            id: id.into(),
            name: String::new(),
            max_weekly_hours: cap,
            subjects_assigned: subjects.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn classroom(id: &str, capacity: u32) -> Classroom {
        Classroom { id: id.into(), name: String::new(), capacity }
    }

    fn demand(subject: &str, faculty: Option<&str>) -> SessionDemand {
        SessionDemand {
            subject_id: subject.into(),
            faculty_id: faculty.map(Into::into),
            required_sessions: 1,
        }
    }

    #[test]
    fn commits_first_free_cell_in_scan_order() {
        let slots = grid::build(&[Day::Mon, Day::Tue], 2, None);
        let subjects = [subject("s1", Some("f1"), None)];
        let faculties = [faculty("f1", None, &[])];
        let rooms = [classroom("r1", 100)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        assert!(solver.place_one(&demand("s1", Some("f1")), &ctx, &mut schedule, &mut state));

        let placed = schedule.get((Day::Mon, 0), &"r1".to_string()).unwrap();
        assert_eq!(placed.subject_id, "s1");
        assert!(!placed.fixed);
    }

    #[test]
    fn missing_or_unknown_faculty_never_places() {
        let slots = grid::build(&[Day::Mon], 2, None);
        let subjects = [subject("s1", None, None)];
        let faculties = [faculty("f1", None, &[])];
        let rooms = [classroom("r1", 100)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        assert!(!solver.place_one(&demand("s1", None), &ctx, &mut schedule, &mut state));
        assert!(!solver.place_one(&demand("s1", Some("ghost")), &ctx, &mut schedule, &mut state));
        assert!(schedule.is_empty());
    }

    #[test]
    fn respects_weekly_workload_cap() {
        let slots = grid::build(&[Day::Mon], 4, None);
        let subjects = [subject("s1", Some("f1"), None)];
        let faculties = [faculty("f1", Some(2), &[])];
        let rooms = [classroom("r1", 100)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        let d = demand("s1", Some("f1"));
        assert!(solver.place_one(&d, &ctx, &mut schedule, &mut state));
        assert!(solver.place_one(&d, &ctx, &mut schedule, &mut state));
        // cap of 2 reached
        assert!(!solver.place_one(&d, &ctx, &mut schedule, &mut state));
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn rejects_unqualified_faculty() {
        let slots = grid::build(&[Day::Mon], 2, None);
        let subjects = [subject("s2", Some("f1"), None)];
        let faculties = [faculty("f1", None, &["s1"])];
        let rooms = [classroom("r1", 100)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        assert!(!solver.place_one(&demand("s2", Some("f1")), &ctx, &mut schedule, &mut state));
    }

    // Scenario: the only classroom is too small for the subject.
    #[test]
    fn undersized_classroom_leaves_demand_unplaced() {
        let slots = grid::build(&[Day::Mon], 2, None);
        let subjects = [subject("s1", Some("f1"), Some(60))];
        let faculties = [faculty("f1", None, &[])];
        let rooms = [classroom("r1", 10)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        assert!(!solver.place_one(&demand("s1", Some("f1")), &ctx, &mut schedule, &mut state));
        assert!(schedule.is_empty());
    }

    #[test]
    fn skips_rooms_below_capacity_but_uses_the_next_one() {
        let slots = grid::build(&[Day::Mon], 1, None);
        let subjects = [subject("s1", Some("f1"), Some(60))];
        let faculties = [faculty("f1", None, &[])];
        let rooms = [classroom("small", 10), classroom("big", 80)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        assert!(solver.place_one(&demand("s1", Some("f1")), &ctx, &mut schedule, &mut state));
        assert!(schedule.get((Day::Mon, 0), &"big".to_string()).is_some());
    }

    #[test]
    fn faculty_is_never_double_booked_across_rooms() {
        let slots = grid::build(&[Day::Mon], 1, None);
        let subjects = [subject("s1", Some("f1"), None), subject("s2", Some("f1"), None)];
        let faculties = [faculty("f1", None, &[])];
        let rooms = [classroom("r1", 100), classroom("r2", 100)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);

        let mut solver = GreedyFirstFit::default();
        solver.begin_candidate(0, &ctx);
        let mut schedule = Schedule::new();
        let mut state = ResourceState::new();
        assert!(solver.place_one(&demand("s1", Some("f1")), &ctx, &mut schedule, &mut state));
        // second subject, same faculty, only slot already booked for f1
        assert!(!solver.place_one(&demand("s2", Some("f1")), &ctx, &mut schedule, &mut state));
    }

    #[test]
    fn greedy_runs_are_reproducible() {
        let slots = grid::build(&[Day::Mon, Day::Tue], 3, None);
        let subjects = [subject("s1", Some("f1"), None)];
        let faculties = [faculty("f1", None, &[])];
        let rooms = [classroom("r1", 100)];
        let ctx = PlacementContext::new(&slots, &subjects, &faculties, &rooms);
        let d = demand("s1", Some("f1"));

        let run = || {
            let mut solver = GreedyFirstFit::default();
            solver.begin_candidate(0, &ctx);
            let mut schedule = Schedule::new();
            let mut state = ResourceState::new();
            for _ in 0..4 {
                solver.place_one(&d, &ctx, &mut schedule, &mut state);
            }
            schedule.to_wire()
        };
        assert_eq!(run(), run());
    }
}
