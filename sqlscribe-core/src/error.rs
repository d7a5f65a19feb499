//! Error types for sqlscribe

use thiserror::Error;

/// The main error type for sqlscribe operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A column, table, or alias token failed identifier validation
    #[error("Invalid identifier '{token}'")]
    InvalidIdentifier { token: String },

    /// A clause was appended where the dialect's transition table forbids it
    #[error("{dialect} dialect: {candidate} cannot follow {current}")]
    InvalidTransition {
        dialect: &'static str,
        current: String,
        candidate: String,
    },

    /// A join was constructed with an illegal condition arrangement
    #[error("Invalid join condition: {message}")]
    InvalidJoinCondition { message: String },

    /// A comparison/arithmetic/membership operand of an unsupported type
    #[error("Unsupported operand: {message}")]
    UnsupportedOperand { message: String },

    /// Insert column count does not match a supplied value row
    #[error("Column/value arity mismatch: {expected} columns but a row has {found} values")]
    ArityMismatch { expected: usize, found: usize },

    /// An unregistered dialect key was requested
    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),

    /// A DDL source path does not exist or is not a .sql file
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Convenience Result type for sqlscribe operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid identifier error
    pub fn invalid_identifier(token: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            token: token.into(),
        }
    }

    /// Create a new invalid transition error
    pub fn invalid_transition(
        dialect: &'static str,
        current: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self::InvalidTransition {
            dialect,
            current: current.into(),
            candidate: candidate.into(),
        }
    }

    /// Create a new invalid join condition error
    pub fn invalid_join_condition(message: impl Into<String>) -> Self {
        Self::InvalidJoinCondition {
            message: message.into(),
        }
    }

    /// Create a new unsupported operand error
    pub fn unsupported_operand(message: impl Into<String>) -> Self {
        Self::UnsupportedOperand {
            message: message.into(),
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }
}
