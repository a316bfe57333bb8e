use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::conflicts;
use crate::data::{Assignment, Classroom, Day, FacultyId, Subject, SubjectId};

/// A rule a valid schedule must never break. The tag set is closed;
/// unknown types fail at the serde boundary instead of passing through
/// as opaque maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum HardRule {
    FacultyAvailability,
    ClassroomAvailability,
    RoomCapacity,
    SubjectPrerequisites {
        #[serde(default)]
        prerequisites: Vec<SubjectId>,
    },
    EquipmentRequirements {
        #[serde(default)]
        equipment: Vec<String>,
    },
}

impl HardRule {
    pub fn name(&self) -> &'static str {
        match self {
            HardRule::FacultyAvailability => "faculty_availability",
            HardRule::ClassroomAvailability => "classroom_availability",
            HardRule::RoomCapacity => "room_capacity",
            HardRule::SubjectPrerequisites { .. } => "subject_prerequisites",
            HardRule::EquipmentRequirements { .. } => "equipment_requirements",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardConstraint {
    #[serde(flatten)]
    pub rule: HardRule,
    pub condition: String,
}

/// A weighted preference. Violations degrade fitness but never
/// invalidate a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SoftRule {
    MaxDailyHours {
        #[serde(default = "default_max_daily_hours")]
        max_hours: u32,
    },
    ConsecutiveClasses {
        #[serde(default = "default_max_consecutive")]
        max_consecutive: u32,
    },
    TimePreferences {
        #[serde(default)]
        faculty_id: Option<FacultyId>,
        #[serde(default)]
        avoid_slots: Vec<u32>,
        #[serde(default)]
        preferred_days: Vec<Day>,
    },
    /// Recognized but not yet evaluated; detection skips it.
    WorkloadDistribution,
}

fn default_max_daily_hours() -> u32 {
    4
}

fn default_max_consecutive() -> u32 {
    3
}

impl SoftRule {
    pub fn name(&self) -> &'static str {
        match self {
            SoftRule::MaxDailyHours { .. } => "max_daily_hours",
            SoftRule::ConsecutiveClasses { .. } => "consecutive_classes",
            SoftRule::TimePreferences { .. } => "time_preferences",
            SoftRule::WorkloadDistribution => "workload_distribution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftConstraint {
    #[serde(flatten)]
    pub rule: SoftRule,
    #[serde(default)]
    pub condition: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Validates constraint declarations wholesale: either every declared
/// constraint is acceptable or the whole batch is rejected. Nothing is
/// partially applied.
pub fn validate(hard: &[HardConstraint], soft: &[SoftConstraint]) -> ValidationOutcome {
    let mut errors = Vec::new();

    for (i, constraint) in hard.iter().enumerate() {
        if constraint.condition.trim().is_empty() {
            errors.push(format!(
                "hard constraint #{} ({}) must carry a non-empty condition",
                i,
                constraint.rule.name()
            ));
        }
    }
    for (i, constraint) in soft.iter().enumerate() {
        if !(0.0..=1.0).contains(&constraint.weight) {
            errors.push(format!(
                "soft constraint #{} ({}) has weight {} outside [0, 1]",
                i,
                constraint.rule.name(),
                constraint.weight
            ));
        }
    }

    ValidationOutcome { is_valid: errors.is_empty(), errors }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub constraint: String,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violations {
    pub hard_violations: Vec<Violation>,
    pub soft_violations: Vec<Violation>,
}

/// Evaluates a schedule against the hard baseline (double bookings and
/// room capacity, always checked) and each declared soft constraint.
/// Soft rules without an evaluator are an explicit no-op, so new
/// constraint types can be declared before their checker ships.
pub fn detect_violations(
    assignments: &[Assignment],
    subjects: &[Subject],
    classrooms: &[Classroom],
    soft: &[SoftConstraint],
) -> Violations {
    let mut hard_violations = Vec::new();

    let report = conflicts::detect(assignments);
    for conflict in report
        .faculty_conflicts
        .iter()
        .chain(report.classroom_conflicts.iter())
    {
        hard_violations.push(Violation {
            constraint: match conflict.conflict_type {
                conflicts::ConflictType::FacultyDoubleBooking => "faculty_availability",
                conflicts::ConflictType::ClassroomDoubleBooking => "classroom_availability",
            }
            .to_string(),
            severity: Severity::High,
            description: format!(
                "{} is booked {} times at {}:{}",
                conflict.resource_id,
                conflict.assignments.len(),
                conflict.day,
                conflict.slot_index
            ),
            weight: None,
        });
    }

    let subject_map: HashMap<&SubjectId, &Subject> = subjects.iter().map(|s| (&s.id, s)).collect();
    let capacity: HashMap<&String, u32> = classrooms.iter().map(|c| (&c.id, c.capacity)).collect();
    for a in assignments {
        let expected = subject_map
            .get(&a.subject_id)
            .map_or(crate::data::DEFAULT_MAX_STUDENTS, |s| s.expected_students());
        if let Some(&cap) = capacity.get(&a.classroom_id) {
            if expected > cap {
                hard_violations.push(Violation {
                    constraint: "room_capacity".to_string(),
                    severity: Severity::High,
                    description: format!(
                        "subject {} expects {} students but classroom {} holds {}",
                        a.subject_id, expected, a.classroom_id, cap
                    ),
                    weight: None,
                });
            }
        }
    }

    let mut soft_violations = Vec::new();
    for constraint in soft {
        match &constraint.rule {
            SoftRule::MaxDailyHours { max_hours } => {
                check_max_daily_hours(assignments, *max_hours, constraint, &mut soft_violations);
            }
            SoftRule::ConsecutiveClasses { max_consecutive } => {
                check_consecutive_classes(
                    assignments,
                    *max_consecutive,
                    constraint,
                    &mut soft_violations,
                );
            }
            SoftRule::TimePreferences { faculty_id, avoid_slots, preferred_days } => {
                check_time_preferences(
                    assignments,
                    faculty_id.as_ref(),
                    avoid_slots,
                    preferred_days,
                    constraint,
                    &mut soft_violations,
                );
            }
            // evaluator not implemented yet; skip, never error
            SoftRule::WorkloadDistribution => {}
        }
    }

    Violations { hard_violations, soft_violations }
}

fn soft_severity(weight: f64) -> Severity {
    if weight >= 0.5 { Severity::Medium } else { Severity::Low }
}

fn check_max_daily_hours(
    assignments: &[Assignment],
    max_hours: u32,
    constraint: &SoftConstraint,
    out: &mut Vec<Violation>,
) {
    let mut per_day: HashMap<(&FacultyId, Day), u32> = HashMap::new();
    for a in assignments {
        *per_day.entry((&a.faculty_id, a.slot.day)).or_insert(0) += 1;
    }
    let mut over: Vec<_> = per_day
        .into_iter()
        .filter(|(_, count)| *count > max_hours)
        .collect();
    over.sort();
    for ((faculty, day), count) in over {
        out.push(Violation {
            constraint: constraint.rule.name().to_string(),
            severity: soft_severity(constraint.weight),
            description: format!(
                "faculty {faculty} teaches {count} sessions on {day}, over the daily limit of {max_hours}"
            ),
            weight: Some(constraint.weight),
        });
    }
}

fn check_consecutive_classes(
    assignments: &[Assignment],
    max_consecutive: u32,
    constraint: &SoftConstraint,
    out: &mut Vec<Violation>,
) {
    let mut slots: HashMap<(&FacultyId, Day), Vec<u32>> = HashMap::new();
    for a in assignments {
        slots
            .entry((&a.faculty_id, a.slot.day))
            .or_default()
            .push(a.slot.slot_index);
    }
    let mut keys: Vec<_> = slots.keys().cloned().collect();
    keys.sort();
    for key in keys {
        let indices = slots.get_mut(&key).unwrap();
        indices.sort_unstable();
        indices.dedup();

        let mut run = 1u32;
        let mut longest = 1u32;
        for pair in indices.windows(2) {
            run = if pair[1] == pair[0] + 1 { run + 1 } else { 1 };
            longest = longest.max(run);
        }
        if longest > max_consecutive {
            let (faculty, day) = key;
            out.push(Violation {
                constraint: constraint.rule.name().to_string(),
                severity: soft_severity(constraint.weight),
                description: format!(
                    "faculty {faculty} has {longest} consecutive sessions on {day}, over the limit of {max_consecutive}"
                ),
                weight: Some(constraint.weight),
            });
        }
    }
}

fn check_time_preferences(
    assignments: &[Assignment],
    faculty_id: Option<&FacultyId>,
    avoid_slots: &[u32],
    preferred_days: &[Day],
    constraint: &SoftConstraint,
    out: &mut Vec<Violation>,
) {
    for a in assignments {
        if faculty_id.is_some_and(|f| *f != a.faculty_id) {
            continue;
        }
        if avoid_slots.contains(&a.slot.slot_index) {
            out.push(Violation {
                constraint: constraint.rule.name().to_string(),
                severity: soft_severity(constraint.weight),
                description: format!(
                    "faculty {} is scheduled at avoided slot {} on {}",
                    a.faculty_id, a.slot.slot_index, a.slot.day
                ),
                weight: Some(constraint.weight),
            });
        }
        if !preferred_days.is_empty() && !preferred_days.contains(&a.slot.day) {
            out.push(Violation {
                constraint: constraint.rule.name().to_string(),
                severity: soft_severity(constraint.weight),
                description: format!(
                    "faculty {} is scheduled on {}, outside their preferred days",
                    a.faculty_id, a.slot.day
                ),
                weight: Some(constraint.weight),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeSlot;

    fn hard(rule: HardRule, condition: &str) -> HardConstraint {
        HardConstraint { rule, condition: condition.into() }
    }

    fn soft(rule: SoftRule, weight: f64) -> SoftConstraint {
        SoftConstraint { rule, condition: "declared".into(), weight }
    }

    fn assignment(day: Day, idx: u32, subject: &str, faculty: &str, room: &str) -> Assignment {
        Assignment {
            slot: TimeSlot { day, slot_index: idx, label: None },
            subject_id: subject.into(),
            faculty_id: faculty.into(),
            classroom_id: room.into(),
            fixed: false,
        }
    }

    #[test]
    fn well_formed_declarations_pass() {
        let outcome = validate(
            &[hard(HardRule::FacultyAvailability, "no faculty double booking")],
            &[soft(SoftRule::MaxDailyHours { max_hours: 4 }, 0.7)],
        );
        assert!(outcome.is_valid);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn validation_collects_every_error() {
        let outcome = validate(
            &[hard(HardRule::RoomCapacity, "   ")],
            &[
                soft(SoftRule::WorkloadDistribution, 1.5),
                soft(SoftRule::ConsecutiveClasses { max_consecutive: 3 }, -0.1),
            ],
        );
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors.len(), 3);
        assert!(outcome.errors[0].contains("room_capacity"));
        assert!(outcome.errors[1].contains("outside [0, 1]"));
    }

    #[test]
    fn unknown_constraint_type_is_rejected_at_the_boundary() {
        let raw = serde_json::json!({
            "type": "lunar_alignment",
            "condition": "x",
            "weight": 0.5
        });
        assert!(serde_json::from_value::<SoftConstraint>(raw).is_err());
    }

    #[test]
    fn constraint_declarations_round_trip_snake_case_tags() {
        let raw = serde_json::json!({
            "type": "time_preferences",
            "facultyId": "f1",
            "avoidSlots": [0, 7],
            "weight": 0.4
        });
        let parsed: SoftConstraint = serde_json::from_value(raw).unwrap();
        assert!(matches!(
            parsed.rule,
            SoftRule::TimePreferences { ref avoid_slots, .. } if avoid_slots == &vec![0, 7]
        ));
    }

    #[test]
    fn capacity_breach_is_a_high_severity_hard_violation() {
        let assignments = [assignment(Day::Mon, 0, "s1", "f1", "tiny")];
        let subjects = [Subject {
            id: "s1".into(),
            name: String::new(),
            teaching_hours: None,
            faculty_assigned: Some("f1".into()),
            max_students: Some(60),
        }];
        let classrooms = [Classroom { id: "tiny".into(), name: String::new(), capacity: 10 }];

        let violations = detect_violations(&assignments, &subjects, &classrooms, &[]);
        assert_eq!(violations.hard_violations.len(), 1);
        let v = &violations.hard_violations[0];
        assert_eq!(v.constraint, "room_capacity");
        assert_eq!(v.severity, Severity::High);
        assert!(violations.soft_violations.is_empty());
    }

    #[test]
    fn double_bookings_surface_as_hard_violations() {
        let assignments = [
            assignment(Day::Mon, 0, "s1", "f1", "r1"),
            assignment(Day::Mon, 0, "s2", "f1", "r2"),
        ];
        let violations = detect_violations(&assignments, &[], &[], &[]);
        assert_eq!(violations.hard_violations.len(), 1);
        assert_eq!(violations.hard_violations[0].constraint, "faculty_availability");
    }

    #[test]
    fn max_daily_hours_checker_flags_overloaded_days() {
        let assignments: Vec<_> =
            (0..4).map(|i| assignment(Day::Mon, i, "s1", "f1", "r1")).collect();
        let constraint = soft(SoftRule::MaxDailyHours { max_hours: 3 }, 0.8);
        let violations = detect_violations(&assignments, &[], &[], &[constraint]);
        assert_eq!(violations.soft_violations.len(), 1);
        let v = &violations.soft_violations[0];
        assert_eq!(v.constraint, "max_daily_hours");
        assert_eq!(v.severity, Severity::Medium);
        assert_eq!(v.weight, Some(0.8));
    }

    #[test]
    fn consecutive_classes_checker_measures_runs_not_totals() {
        // slots 0,1,2 back to back, then a gap, then 5
        let assignments: Vec<_> = [0, 1, 2, 5]
            .into_iter()
            .map(|i| assignment(Day::Tue, i, "s1", "f1", "r1"))
            .collect();
        let over = detect_violations(
            &assignments,
            &[],
            &[],
            &[soft(SoftRule::ConsecutiveClasses { max_consecutive: 2 }, 0.3)],
        );
        assert_eq!(over.soft_violations.len(), 1);
        assert_eq!(over.soft_violations[0].severity, Severity::Low);

        let within = detect_violations(
            &assignments,
            &[],
            &[],
            &[soft(SoftRule::ConsecutiveClasses { max_consecutive: 3 }, 0.3)],
        );
        assert!(within.soft_violations.is_empty());
    }

    #[test]
    fn time_preferences_checker_scopes_to_the_named_faculty() {
        let assignments = [
            assignment(Day::Mon, 7, "s1", "f1", "r1"),
            assignment(Day::Mon, 7, "s2", "f2", "r2"),
        ];
        let constraint = soft(
            SoftRule::TimePreferences {
                faculty_id: Some("f1".into()),
                avoid_slots: vec![7],
                preferred_days: vec![],
            },
            0.6,
        );
        let violations = detect_violations(&assignments, &[], &[], &[constraint]);
        assert_eq!(violations.soft_violations.len(), 1);
        assert!(violations.soft_violations[0].description.contains("f1"));
    }

    #[test]
    fn unimplemented_soft_rule_is_a_silent_no_op() {
        let assignments = [assignment(Day::Mon, 0, "s1", "f1", "r1")];
        let violations = detect_violations(
            &assignments,
            &[],
            &[],
            &[soft(SoftRule::WorkloadDistribution, 0.9)],
        );
        assert!(violations.soft_violations.is_empty());
    }
}
