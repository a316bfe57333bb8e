use log::info;
use std::time::{Duration, Instant};

use crate::data::{
    CandidateOption, ConstraintRequest, Day, DebugInfo, GenerateRequest, GenerateResponse,
    DEFAULT_SLOTS_PER_DAY,
};
use crate::error::EngineError;
use crate::generator::{self, GenerationBudget};
use crate::placer::{self, PlacementContext};
use crate::resources::ResourceState;
use crate::{conflicts, constraints, demand, fitness, grid, seed};

// fallback rng seed for the randomized strategy, for reproducibility
const DEFAULT_SEED: u64 = 1234;

/// Runs one full generation request: input validation, grid and demand
/// construction, fixed seeding, N candidate runs, fitness ranking. The
/// returned schedules are complete, internally consistent values;
/// persisting a chosen one is the caller's concern.
pub fn generate(request: &GenerateRequest) -> Result<GenerateResponse, EngineError> {
    let start_time = Instant::now();

    // fail fast on an insufficient snapshot; never partially run
    if request.subjects.is_empty() {
        return Err(EngineError::NoSubjects {
            department: request.department.clone(),
            semester: request.semester,
        });
    }
    if request.faculty.is_empty() {
        return Err(EngineError::NoFaculty { department: request.department.clone() });
    }
    if request.classrooms.is_empty() {
        return Err(EngineError::NoClassrooms { department: request.department.clone() });
    }

    let working_days = parse_days(request.days.as_deref())?;
    let slots_per_day = request.slots_per_day.unwrap_or(DEFAULT_SLOTS_PER_DAY);
    if working_days.is_empty() || slots_per_day == 0 {
        return Err(EngineError::EmptyGrid);
    }

    let slot_grid = grid::build(&working_days, slots_per_day, request.slot_times.as_deref());
    let demands = demand::build(&request.subjects);
    let demanded_sessions: u32 = demands.iter().map(|d| d.required_sessions).sum();
    info!(
        "timetable generation for {} sem {} ({}): {} subjects, {} faculty, {} classrooms, {} grid cells",
        request.department,
        request.semester,
        request.academic_year,
        request.subjects.len(),
        request.faculty.len(),
        request.classrooms.len(),
        slot_grid.len()
    );

    let mut seeded_state = ResourceState::new();
    let (fixed_seed, fixed_collisions) =
        seed::load_fixed(&request.fixed_assignments, &mut seeded_state);

    let ctx = PlacementContext::new(
        &slot_grid,
        &request.subjects,
        &request.faculty,
        &request.classrooms,
    );
    let mut solver = placer::make_solver(request.strategy, request.seed.unwrap_or(DEFAULT_SEED));
    let budget = match request.time_budget_ms {
        Some(ms) => GenerationBudget::with_deadline(start_time + Duration::from_millis(ms)),
        None => GenerationBudget::default(),
    };

    let candidates = generator::generate(
        &demands,
        &ctx,
        &fixed_seed,
        &seeded_state,
        solver.as_mut(),
        request.options.unwrap_or(1),
        &budget,
    );

    let mut options: Vec<CandidateOption> = candidates
        .into_iter()
        .map(|c| CandidateOption {
            id: 0,
            assignments: c.schedule.to_wire(),
            unresolved: c.unresolved,
            fitness: fitness::score(
                &c.workload,
                c.schedule.len(),
                slot_grid.len(),
                request.classrooms.len(),
            ),
            timed_out: c.timed_out,
        })
        .collect();
    // rank best-first; stable sort keeps generation order on ties
    options.sort_by(|a, b| b.fitness.score.total_cmp(&a.fitness.score));
    for (rank, option) in options.iter_mut().enumerate() {
        option.id = rank as u32 + 1;
    }

    let top_assignments: Vec<_> = options
        .first()
        .map(|o| o.assignments.values().cloned().collect())
        .unwrap_or_default();
    let conflict_report = conflicts::detect(&top_assignments);

    let elapsed = start_time.elapsed();
    info!(
        "generated {} option(s) in {:.2?}; best score {:.1}, {} conflict(s)",
        options.len(),
        elapsed,
        options.first().map_or(0.0, |o| o.fitness.score),
        conflict_report.summary.total
    );

    let debug = request.debug.then(|| DebugInfo {
        grid_cells: slot_grid.len(),
        classroom_count: request.classrooms.len(),
        demanded_sessions,
        strategy: request.strategy,
        elapsed_ms: elapsed.as_millis(),
    });

    Ok(GenerateResponse { ok: true, options, conflict_report, fixed_collisions, debug })
}

/// Validates constraint declarations and, when a schedule is attached,
/// evaluates violations against it. Malformed declarations reject the
/// whole batch.
pub fn check_constraints(
    request: &ConstraintRequest,
) -> Result<(constraints::ValidationOutcome, Option<constraints::Violations>), EngineError> {
    let outcome = constraints::validate(&request.hard_constraints, &request.soft_constraints);
    if !outcome.is_valid {
        return Err(EngineError::ConstraintValidation(outcome.errors));
    }

    let violations = request.assignments.as_ref().map(|assignments| {
        constraints::detect_violations(
            assignments,
            &request.subjects,
            &request.classrooms,
            &request.soft_constraints,
        )
    });
    Ok((outcome, violations))
}

fn parse_days(names: Option<&[String]>) -> Result<Vec<Day>, EngineError> {
    match names {
        None => Ok(Day::default_working_week()),
        Some(names) => names
            .iter()
            .map(|n| Day::parse(n).ok_or_else(|| EngineError::UnknownDay(n.clone())))
            .collect(),
    }
}
