//! Timetable generation core for a university timetable manager.
//!
//! Assigns subject teaching sessions to (day, slot, faculty, classroom)
//! cells with a first-fit heuristic, detects double bookings, validates
//! hard/soft constraint declarations, and ranks candidate timetables by
//! faculty workload balance. Persistence, auth, and notification
//! delivery live upstream; this crate only consumes their snapshots and
//! hands back complete schedule values.

pub mod conflicts;
pub mod constraints;
pub mod data;
pub mod demand;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod generator;
pub mod grid;
pub mod placer;
pub mod resources;
pub mod seed;
pub mod server;

pub use conflicts::ConflictReport;
pub use data::{Assignment, Schedule, SessionDemand, TimeSlot};
pub use error::EngineError;
pub use fitness::FitnessResult;
pub use placer::{GreedyFirstFit, RandomizedFirstFit, Solver, Strategy};
