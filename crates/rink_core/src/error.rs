use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Field not in state schema: {field}")]
    SchemaViolation { field: String },

    #[error("Player {player} cannot {operation} without control")]
    NotInControl { player: String, operation: &'static str },

    #[error("Unrecognized game phase: {0}")]
    UnrecognizedPhase(String),

    #[error("Unknown action label: {0}")]
    UnknownAction(String),

    #[error("Phase transitions did not settle within {limit} steps")]
    TransitionLimit { limit: usize },

    #[error("Snapshot does not match schema: missing {missing:?}, unknown {unknown:?}")]
    SnapshotMismatch { missing: Vec<String>, unknown: Vec<String> },

    #[error("Field {field} expects a {expected} value")]
    FieldType { field: String, expected: &'static str },

    #[error("Field {field} is fixed for the lifetime of the game")]
    ReadOnlyField { field: String },

    #[error("Control slot team={team} index={index} is not on the roster")]
    InvalidControl { team: i64, index: i64 },

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SimError {
    /// Precondition violations are programming errors; everything else is bad input.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SimError::SchemaViolation { .. }
                | SimError::NotInControl { .. }
                | SimError::UnrecognizedPhase(_)
                | SimError::TransitionLimit { .. }
        )
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for SimError {
    fn from(err: serde_yaml::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
