use log::{info, trace};
use std::time::Instant;

use crate::data::{Schedule, SessionDemand};
use crate::placer::{PlacementContext, Solver};
use crate::resources::ResourceState;

/// Cooperative time budget checked inside the per-demand placement
/// loop, so a pathological worklist (many unsatisfiable demands, each
/// scanning the full grid) cannot run unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationBudget {
    pub deadline: Option<Instant>,
}

impl GenerationBudget {
    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline: Some(deadline) }
    }

    pub fn exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// One full attempt at producing a complete schedule.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub schedule: Schedule,
    pub unresolved: Vec<SessionDemand>,
    /// Final workload snapshot for the run, for fitness scoring.
    pub workload: std::collections::HashMap<crate::data::FacultyId, u32>,
    pub timed_out: bool,
}

/// Runs the solver `max(1, option_count)` times. Every candidate starts
/// from a fresh clone of the fixed seed and its pre-booked resource
/// state; no mutable state crosses candidate boundaries. With a purely
/// deterministic solver all candidates come out identical — diversity
/// requires the randomized strategy.
pub fn generate(
    demands: &[SessionDemand],
    ctx: &PlacementContext<'_>,
    fixed_seed: &Schedule,
    seeded_state: &ResourceState,
    solver: &mut dyn Solver,
    option_count: u32,
    budget: &GenerationBudget,
) -> Vec<Candidate> {
    let runs = option_count.max(1);
    info!(
        "generating {} candidate(s): {} demand(s) over a {}-cell grid, {} classroom(s)",
        runs,
        demands.len(),
        ctx.grid.len(),
        ctx.classrooms.len()
    );

    (0..runs)
        .map(|i| run_candidate(i as usize, demands, ctx, fixed_seed, seeded_state, solver, budget))
        .collect()
}

fn run_candidate(
    index: usize,
    demands: &[SessionDemand],
    ctx: &PlacementContext<'_>,
    fixed_seed: &Schedule,
    seeded_state: &ResourceState,
    solver: &mut dyn Solver,
    budget: &GenerationBudget,
) -> Candidate {
    let mut schedule = fixed_seed.clone();
    let mut state = seeded_state.clone();
    solver.begin_candidate(index, ctx);

    let mut unresolved = Vec::new();
    let mut timed_out = false;
    for (di, demand) in demands.iter().enumerate() {
        let mut remaining = demand.required_sessions;
        while remaining > 0 {
            if budget.exhausted() {
                timed_out = true;
                break;
            }
            if solver.place_one(demand, ctx, &mut schedule, &mut state) {
                remaining -= 1;
            } else {
                break;
            }
        }
        if remaining > 0 {
            unresolved.push(SessionDemand { required_sessions: remaining, ..demand.clone() });
        }
        if timed_out {
            // everything after the current demand stays unplaced
            for later in &demands[di + 1..] {
                if later.required_sessions > 0 {
                    unresolved.push(later.clone());
                }
            }
            break;
        }
    }

    trace!(
        "candidate {}: {} assignment(s), {} unresolved demand(s){}",
        index,
        schedule.len(),
        unresolved.len(),
        if timed_out { ", timed out" } else { "" }
    );

    Candidate { schedule, unresolved, workload: state.workload(), timed_out }
}
