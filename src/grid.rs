use crate::data::{Day, TimeSlot};

/// Builds the finite set of schedulable cells for a working week:
/// `|working_days| * slots_per_day` slots, day-major then
/// slot-index-minor. This order is the Placer's scan order and is part
/// of the observable behavior, not an implementation detail.
pub fn build(
    working_days: &[Day],
    slots_per_day: u32,
    slot_times: Option<&[String]>,
) -> Vec<TimeSlot> {
    let mut grid = Vec::with_capacity(working_days.len() * slots_per_day as usize);
    for &day in working_days {
        for slot_index in 0..slots_per_day {
            let label = slot_times
                .and_then(|times| times.get(slot_index as usize))
                .cloned();
            grid.push(TimeSlot { day, slot_index, label });
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grid_has_days_times_slots_cells_all_distinct() {
        let days = [Day::Mon, Day::Tue, Day::Wed];
        let grid = build(&days, 4, None);
        assert_eq!(grid.len(), 12);
        let keys: HashSet<_> = grid.iter().map(|s| s.key()).collect();
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn grid_is_day_major_slot_minor() {
        let grid = build(&[Day::Mon, Day::Tue], 2, None);
        let keys: Vec<_> = grid.iter().map(|s| s.key()).collect();
        assert_eq!(
            keys,
            vec![(Day::Mon, 0), (Day::Mon, 1), (Day::Tue, 0), (Day::Tue, 1)]
        );
    }

    #[test]
    fn slot_times_apply_positionally() {
        let times = vec!["09:00".to_string(), "10:00".to_string()];
        let grid = build(&[Day::Mon], 3, Some(&times));
        assert_eq!(grid[0].label.as_deref(), Some("09:00"));
        assert_eq!(grid[1].label.as_deref(), Some("10:00"));
        // no label supplied for the third slot
        assert_eq!(grid[2].label, None);
    }

    #[test]
    fn grid_build_is_deterministic() {
        let days = [Day::Mon, Day::Fri];
        assert_eq!(build(&days, 8, None), build(&days, 8, None));
    }

    #[test]
    fn empty_day_list_yields_empty_grid() {
        assert!(build(&[], 8, None).is_empty());
    }
}
