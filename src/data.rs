use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::conflicts::ConflictReport;
use crate::constraints::{HardConstraint, SoftConstraint};
use crate::fitness::FitnessResult;
use crate::placer::Strategy;
use crate::seed::FixedCollision;

// Type aliases for clarity; ids come from the upstream document store.
pub type SubjectId = String;
pub type FacultyId = String;
pub type ClassroomId = String;
pub type DepartmentId = String;

pub const DEFAULT_TEACHING_HOURS: u32 = 3;
pub const DEFAULT_MAX_STUDENTS: u32 = 60;
pub const DEFAULT_MAX_WEEKLY_HOURS: u32 = 40;
pub const DEFAULT_SLOTS_PER_DAY: u32 = 8;

/// A working day. Ord follows week order, which drives the day-major
/// grid scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    /// Parses a day name case-insensitively, accepting both short
    /// ("mon") and full ("Monday") forms.
    pub fn parse(name: &str) -> Option<Day> {
        match name.to_ascii_lowercase().as_str() {
            "mon" | "monday" => Some(Day::Mon),
            "tue" | "tuesday" => Some(Day::Tue),
            "wed" | "wednesday" => Some(Day::Wed),
            "thu" | "thursday" => Some(Day::Thu),
            "fri" | "friday" => Some(Day::Fri),
            "sat" | "saturday" => Some(Day::Sat),
            "sun" | "sunday" => Some(Day::Sun),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "mon",
            Day::Tue => "tue",
            Day::Wed => "wed",
            Day::Thu => "thu",
            Day::Fri => "fri",
            Day::Sat => "sat",
            Day::Sun => "sun",
        }
    }

    /// Default working week when the request omits `days`.
    pub fn default_working_week() -> Vec<Day> {
        vec![Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a schedulable cell: (day, slot index).
pub type SlotKey = (Day, u32);

/// One (day, index) teaching period. Immutable once the grid is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day: Day,
    pub slot_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TimeSlot {
    pub fn key(&self) -> SlotKey {
        (self.day, self.slot_index)
    }
}

/// A subject to be scheduled for a (department, semester) scope.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    #[serde(default)]
    pub name: String,
    /// Weekly teaching sessions required; defaults to 3 when unset.
    #[serde(default)]
    pub teaching_hours: Option<u32>,
    /// Owning faculty; a subject without one is unsatisfiable and
    /// surfaces as unresolved.
    #[serde(default)]
    pub faculty_assigned: Option<FacultyId>,
    /// Expected enrollment; defaults to 60 when unset.
    #[serde(default)]
    pub max_students: Option<u32>,
}

impl Subject {
    pub fn weekly_sessions(&self) -> u32 {
        self.teaching_hours.unwrap_or(DEFAULT_TEACHING_HOURS)
    }

    pub fn expected_students(&self) -> u32 {
        self.max_students.unwrap_or(DEFAULT_MAX_STUDENTS)
    }
}

/// A faculty member with workload and qualification limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    #[serde(default)]
    pub name: String,
    /// Weekly session cap; defaults to 40 when unset.
    #[serde(default)]
    pub max_weekly_hours: Option<u32>,
    /// Qualification whitelist; empty means unrestricted.
    #[serde(default)]
    pub subjects_assigned: Vec<SubjectId>,
}

impl Faculty {
    pub fn weekly_cap(&self) -> u32 {
        self.max_weekly_hours.unwrap_or(DEFAULT_MAX_WEEKLY_HOURS)
    }

    pub fn qualified_for(&self, subject: &SubjectId) -> bool {
        self.subjects_assigned.is_empty() || self.subjects_assigned.contains(subject)
    }
}

/// A physical classroom with a given capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: ClassroomId,
    #[serde(default)]
    pub name: String,
    pub capacity: u32,
}

/// The atomic unit of a schedule: a (subject, faculty, classroom)
/// binding committed to one slot. `fixed` entries are carried over from
/// an approved timetable and immune to reassignment within a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub slot: TimeSlot,
    pub subject_id: SubjectId,
    pub faculty_id: FacultyId,
    pub classroom_id: ClassroomId,
    #[serde(default)]
    pub fixed: bool,
}

/// One subject's outstanding need for N more weekly sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDemand {
    pub subject_id: SubjectId,
    #[serde(default)]
    pub faculty_id: Option<FacultyId>,
    pub required_sessions: u32,
}

/// A candidate timetable: sparse mapping keyed by slot and classroom
/// (absent = free period). Faculty occupancy lives in `ResourceState`,
/// never inferred from slot occupancy alone.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: BTreeMap<(SlotKey, ClassroomId), Assignment>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, assignment: Assignment) {
        let key = (assignment.slot.key(), assignment.classroom_id.clone());
        self.entries.insert(key, assignment);
    }

    pub fn get(&self, slot: SlotKey, classroom: &ClassroomId) -> Option<&Assignment> {
        self.entries.get(&(slot, classroom.clone()))
    }

    pub fn contains(&self, slot: SlotKey, classroom: &ClassroomId) -> bool {
        self.get(slot, classroom).is_some()
    }

    /// Assignments in day-major, slot-minor, classroom order.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire form: map keyed `day:slotIndex:classroomId`.
    pub fn to_wire(&self) -> BTreeMap<String, Assignment> {
        self.entries
            .iter()
            .map(|(((day, idx), room), a)| (format!("{day}:{idx}:{room}"), a.clone()))
            .collect()
    }
}

/// Request body for `POST /v1/timetable/generate`. Carries the
/// read-only resource snapshot the caller fetched upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub academic_year: String,
    pub semester: u32,
    pub department: DepartmentId,
    #[serde(default)]
    pub days: Option<Vec<String>>,
    #[serde(default)]
    pub slots_per_day: Option<u32>,
    #[serde(default)]
    pub slot_times: Option<Vec<String>>,
    #[serde(default)]
    pub options: Option<u32>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    pub subjects: Vec<Subject>,
    pub faculty: Vec<Faculty>,
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub fixed_assignments: Vec<Assignment>,
}

/// One ranked candidate timetable in the response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOption {
    pub id: u32,
    pub assignments: BTreeMap<String, Assignment>,
    pub unresolved: Vec<SessionDemand>,
    pub fitness: FitnessResult,
    pub timed_out: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub grid_cells: usize,
    pub classroom_count: usize,
    pub demanded_sessions: u32,
    pub strategy: Strategy,
    pub elapsed_ms: u128,
}

/// The final output of a generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub ok: bool,
    pub options: Vec<CandidateOption>,
    /// Conflict report for the top-ranked candidate.
    pub conflict_report: ConflictReport,
    pub fixed_collisions: Vec<FixedCollision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// Request body for `POST /v1/timetable/conflicts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckRequest {
    pub assignments: Vec<Assignment>,
}

/// Request body for `POST /v1/constraints/validate`. When a schedule is
/// attached, hard/soft violations are evaluated against it too.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintRequest {
    #[serde(default)]
    pub hard_constraints: Vec<HardConstraint>,
    #[serde(default)]
    pub soft_constraints: Vec<SoftConstraint>,
    #[serde(default)]
    pub assignments: Option<Vec<Assignment>>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
}
