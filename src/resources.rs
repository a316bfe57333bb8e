use std::collections::{HashMap, HashSet};

use crate::data::{ClassroomId, Day, FacultyId, SlotKey};

/// Per-run booking state for one faculty member.
#[derive(Debug, Clone, Default)]
pub struct FacultyState {
    pub assigned_count: u32,
    pub booked_slots: HashSet<SlotKey>,
    pub per_day: HashMap<Day, u32>,
}

/// Per-run booking state for one classroom.
#[derive(Debug, Clone, Default)]
pub struct ClassroomState {
    pub booked_slots: HashSet<SlotKey>,
}

/// Mutable scheduling state for one candidate run. Owned exclusively by
/// that run and discarded afterwards; cloning the seeded state is how
/// independent candidates start from the same fixed baseline.
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    faculty: HashMap<FacultyId, FacultyState>,
    classrooms: HashMap<ClassroomId, ClassroomState>,
}

impl ResourceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faculty_booked(&self, faculty: &FacultyId, slot: SlotKey) -> bool {
        self.faculty
            .get(faculty)
            .is_some_and(|s| s.booked_slots.contains(&slot))
    }

    pub fn classroom_booked(&self, classroom: &ClassroomId, slot: SlotKey) -> bool {
        self.classrooms
            .get(classroom)
            .is_some_and(|s| s.booked_slots.contains(&slot))
    }

    pub fn assigned_count(&self, faculty: &FacultyId) -> u32 {
        self.faculty.get(faculty).map_or(0, |s| s.assigned_count)
    }

    pub fn daily_count(&self, faculty: &FacultyId, day: Day) -> u32 {
        self.faculty
            .get(faculty)
            .and_then(|s| s.per_day.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// Books a faculty member at a slot and bumps their weekly and
    /// per-day counts. Idempotent per (faculty, slot).
    pub fn book_faculty(&mut self, faculty: &FacultyId, slot: SlotKey) {
        let state = self.faculty.entry(faculty.clone()).or_default();
        if state.booked_slots.insert(slot) {
            state.assigned_count += 1;
            *state.per_day.entry(slot.0).or_insert(0) += 1;
        }
    }

    pub fn book_classroom(&mut self, classroom: &ClassroomId, slot: SlotKey) {
        self.classrooms
            .entry(classroom.clone())
            .or_default()
            .booked_slots
            .insert(slot);
    }

    /// Weekly session count per faculty with at least one assignment.
    pub fn workload(&self) -> HashMap<FacultyId, u32> {
        self.faculty
            .iter()
            .filter(|(_, s)| s.assigned_count > 0)
            .map(|(id, s)| (id.clone(), s.assigned_count))
            .collect()
    }
}
