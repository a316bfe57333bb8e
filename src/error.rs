use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the scheduling core. Unresolved demands and
/// fixed-slot collisions are returned as data, not errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no subjects found for department {department}, semester {semester}")]
    NoSubjects { department: String, semester: u32 },

    #[error("no faculty found for department {department}")]
    NoFaculty { department: String },

    #[error("no classrooms available for department {department}")]
    NoClassrooms { department: String },

    #[error("unrecognized day name: {0:?}")]
    UnknownDay(String),

    #[error("grid is empty: need at least one working day and one slot per day")]
    EmptyGrid,

    #[error("constraint validation failed: {}", .0.join("; "))]
    ConstraintValidation(Vec<String>),
}

impl EngineError {
    pub fn status(&self) -> StatusCode {
        // Everything here is caller-correctable input; internal faults
        // are handled at the server boundary.
        StatusCode::BAD_REQUEST
    }
}
