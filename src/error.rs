//! Error types.
//!
//! Only contract violations are errors. Degenerate but well-formed inputs
//! (no eligible faculty, an empty domain) never fail; the solver encodes
//! them in the fitness score or returns an empty timetable instead.

use thiserror::Error;

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimetableError {
    /// The problem instance is malformed or failed validation.
    #[error("invalid problem instance: {0}")]
    Instance(#[from] InstanceError),

    /// The search configuration is invalid.
    #[error("invalid search configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Problems with the shape or content of a [`ProblemInstance`](crate::problem::ProblemInstance),
/// or with a session list checked against one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("duplicate day `{0}`")]
    DuplicateDay(String),

    #[error("duplicate timeslot `{0}`")]
    DuplicateTimeslot(String),

    #[error("duplicate subject code `{0}`")]
    DuplicateSubject(String),

    #[error("duplicate faculty member `{0}`")]
    DuplicateFaculty(String),

    #[error("subject `{subject}` lists batch `{batch}` more than once")]
    DuplicateSubjectBatch { subject: String, batch: String },

    #[error("faculty `{faculty}` lists subject `{subject}` more than once")]
    DuplicateFacultySubject { faculty: String, subject: String },

    #[error("no {0} found; add at least one")]
    Empty(&'static str),

    #[error("faculty members have not been assigned any subjects")]
    NoFacultyAssignments,

    #[error("subject `{subject}` lists unknown batch `{batch}`")]
    UnknownBatch { subject: String, batch: String },

    #[error("faculty `{faculty}` lists unknown subject `{subject}`")]
    UnknownSubject { faculty: String, subject: String },

    #[error("session {index}: unknown {field} `{value}`")]
    UnknownReference {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("session {index}: batch `{batch}` is not eligible for subject `{subject}`")]
    IneligibleBatch {
        index: usize,
        batch: String,
        subject: String,
    },

    #[error("session {index}: faculty `{faculty}` is not eligible for subject `{subject}`")]
    IneligibleFaculty {
        index: usize,
        faculty: String,
        subject: String,
    },
}

/// Invalid search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2")]
    PopulationTooSmall,

    #[error("max_generations must be at least 1")]
    NoGenerations,

    #[error("tournament_size must be at least 1")]
    EmptyTournament,

    #[error("elite_ratio too high: elites fill entire population")]
    EliteFillsPopulation,

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,

    #[error("runs must be at least 1")]
    NoRuns,
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_instance_error() {
        let err: TimetableError = InstanceError::Empty("rooms").into();
        assert_eq!(
            err.to_string(),
            "invalid problem instance: no rooms found; add at least one"
        );
    }

    #[test]
    fn test_from_config_error() {
        let err: TimetableError = ConfigError::PopulationTooSmall.into();
        assert!(matches!(err, TimetableError::Config(_)));
        assert!(err.to_string().contains("population_size"));
    }
}
