use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data::{Assignment, Day, Schedule, SlotKey};
use crate::resources::ResourceState;

/// Two fixed entries claimed the same (day, slot) cell. The first-seen
/// entry is kept; the collision is reported, never silently resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCollision {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub day: Day,
    pub slot_index: u32,
    pub kept: Assignment,
    pub discarded: Assignment,
}

pub const FIXED_CONFLICT: &str = "fixed_conflict";

/// Seeds a schedule with assignments carried over from an approved
/// timetable. Inserted entries are marked `fixed` and book both the
/// classroom and the faculty in `state` for the whole run, so the
/// Placer can never reuse those cells.
pub fn load_fixed(
    existing: &[Assignment],
    state: &mut ResourceState,
) -> (Schedule, Vec<FixedCollision>) {
    let mut seed = Schedule::new();
    let mut collisions = Vec::new();
    // first-seen entry per slot key wins
    let mut claimed: BTreeMap<SlotKey, Assignment> = BTreeMap::new();

    for assignment in existing {
        let key = assignment.slot.key();
        if let Some(kept) = claimed.get(&key) {
            warn!(
                "fixed assignment collision at {}:{} between subjects {} and {}",
                key.0, key.1, kept.subject_id, assignment.subject_id
            );
            collisions.push(FixedCollision {
                kind: FIXED_CONFLICT,
                day: key.0,
                slot_index: key.1,
                kept: kept.clone(),
                discarded: assignment.clone(),
            });
            continue;
        }

        let mut fixed = assignment.clone();
        fixed.fixed = true;
        state.book_classroom(&fixed.classroom_id, key);
        state.book_faculty(&fixed.faculty_id, key);
        claimed.insert(key, fixed.clone());
        seed.insert(fixed);
    }

    (seed, collisions)
}
