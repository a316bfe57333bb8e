use crate::data::{SessionDemand, Subject};

/// Turns each subject's weekly teaching hours into a worklist of
/// session demands, one per subject. The worklist keeps the subject
/// input order: when slots run out, earlier subjects win. That is a
/// scheduling-fairness property of the heuristic, not hidden
/// nondeterminism.
pub fn build(subjects: &[Subject]) -> Vec<SessionDemand> {
    subjects
        .iter()
        .map(|s| SessionDemand {
            subject_id: s.id.clone(),
            faculty_id: s.faculty_assigned.clone(),
            required_sessions: s.weekly_sessions(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, hours: Option<u32>, faculty: Option<&str>) -> Subject {
        Subject {
            id: id.into(),
            name: String::new(),
            teaching_hours: hours,
            faculty_assigned: faculty.map(Into::into),
            max_students: None,
        }
    }

    #[test]
    fn one_demand_per_subject_in_input_order() {
        let subjects = vec![
            subject("s2", Some(4), Some("f1")),
            subject("s1", None, Some("f2")),
        ];
        let demands = build(&subjects);
        assert_eq!(demands.len(), 2);
        assert_eq!(demands[0].subject_id, "s2");
        assert_eq!(demands[0].required_sessions, 4);
        assert_eq!(demands[1].subject_id, "s1");
        // teaching hours default to 3
        assert_eq!(demands[1].required_sessions, 3);
    }

    #[test]
    fn missing_faculty_is_carried_not_rejected() {
        let demands = build(&[subject("s1", Some(2), None)]);
        assert_eq!(demands[0].faculty_id, None);
        assert_eq!(demands[0].required_sessions, 2);
    }
}
