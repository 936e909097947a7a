//! Unified error type for guarded transfers
//!
//! A single error enum covers the two usage bugs the guard exists to catch
//! (aliasing without a cloner, reuse of a consumed object) together with the
//! configuration failures that can happen while building a guard.

/// Error type for all guard operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    /// Two tracked positions refer to the same object and no cloner is configured
    #[error("Same object used more than once: position {position} aliases position {first_seen}")]
    AliasWithoutCloner {
        /// Position of the repeated occurrence
        position: usize,
        /// Position where the object was first seen
        first_seen: usize,
    },

    /// An object already marked invalid was used without the bypass
    #[error(
        "Consumed object reused{}",
        .position.map(|p| format!(" at position {p}")).unwrap_or_default()
    )]
    ConsumedObject {
        /// Argument position, when raised by a guarded call
        position: Option<usize>,
    },

    /// The argument vector does not fit the operation's policy
    #[error("Arity mismatch: expected {expected} arguments, got {actual}")]
    ArityMismatch {
        /// Human readable description of the accepted argument count
        expected: String,
        /// Number of arguments supplied (receiver included)
        actual: usize,
    },

    /// Policy rejected at construction time
    #[error("Invalid policy: {message}")]
    InvalidPolicy {
        /// Error message describing the policy problem
        message: String,
    },

    /// No policy registered for the named operation
    #[error("Unknown operation: {name}")]
    UnknownOperation {
        /// Name that was looked up
        name: String,
    },

    /// Configuration could not be read or parsed
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration failure
        message: String,
    },
}

impl GuardError {
    /// Create an alias error for a repeated position
    pub fn alias(position: usize, first_seen: usize) -> Self {
        Self::AliasWithoutCloner {
            position,
            first_seen,
        }
    }

    /// Create a consumed-object error raised by a guarded call
    pub fn consumed_at(position: usize) -> Self {
        Self::ConsumedObject {
            position: Some(position),
        }
    }

    /// Create a consumed-object error raised by direct consumption
    pub fn consumed() -> Self {
        Self::ConsumedObject { position: None }
    }

    /// Create an arity error
    pub fn arity(expected: impl Into<String>, actual: usize) -> Self {
        Self::ArityMismatch {
            expected: expected.into(),
            actual,
        }
    }

    /// Create an invalid policy error
    pub fn invalid_policy(message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            message: message.into(),
        }
    }

    /// Create an unknown operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` for the aliasing error
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::AliasWithoutCloner { .. })
    }

    /// Returns `true` for the consumed-object error
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::ConsumedObject { .. })
    }
}

/// Standard Result type for guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

impl From<std::io::Error> for GuardError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<toml::de::Error> for GuardError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {err}"))
    }
}

impl From<toml::ser::Error> for GuardError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization failed: {err}"))
    }
}
