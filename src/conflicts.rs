use itertools::Itertools;
use serde::Serialize;

use crate::data::{Assignment, Day, SlotKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    FacultyDoubleBooking,
    ClassroomDoubleBooking,
}

/// One resource booked more than once in the same (day, slot) cell,
/// listing every colliding assignment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub conflict_type: ConflictType,
    pub day: Day,
    pub slot_index: u32,
    /// The double-booked faculty or classroom id.
    pub resource_id: String,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSummary {
    pub total: usize,
    pub faculty: usize,
    pub classroom: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub faculty_conflicts: Vec<Conflict>,
    pub classroom_conflicts: Vec<Conflict>,
    pub summary: ConflictSummary,
}

impl ConflictReport {
    pub fn is_clean(&self) -> bool {
        self.summary.total == 0
    }
}

/// Post-hoc scan of a committed schedule for double bookings. Pure and
/// read-only, so it can run against any schedule regardless of how it
/// was produced (generated, hand-edited, restored).
pub fn detect(assignments: &[Assignment]) -> ConflictReport {
    let faculty_conflicts = double_bookings(
        assignments,
        ConflictType::FacultyDoubleBooking,
        |a| a.faculty_id.clone(),
    );
    let classroom_conflicts = double_bookings(
        assignments,
        ConflictType::ClassroomDoubleBooking,
        |a| a.classroom_id.clone(),
    );

    let summary = ConflictSummary {
        total: faculty_conflicts.len() + classroom_conflicts.len(),
        faculty: faculty_conflicts.len(),
        classroom: classroom_conflicts.len(),
    };
    ConflictReport { faculty_conflicts, classroom_conflicts, summary }
}

fn double_bookings(
    assignments: &[Assignment],
    conflict_type: ConflictType,
    resource: impl Fn(&Assignment) -> String,
) -> Vec<Conflict> {
    let grouped = assignments
        .iter()
        .map(|a| ((a.slot.key(), resource(a)), a))
        .into_group_map();

    let mut conflicts: Vec<Conflict> = grouped
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|((key, resource_id), group): ((SlotKey, String), _)| Conflict {
            conflict_type,
            day: key.0,
            slot_index: key.1,
            resource_id,
            assignments: group.into_iter().cloned().collect(),
        })
        .collect();
    // group maps are unordered; sort for stable, idempotent reports
    conflicts.sort_by(|a, b| {
        (a.day, a.slot_index, &a.resource_id).cmp(&(b.day, b.slot_index, &b.resource_id))
    });
    conflicts
}
