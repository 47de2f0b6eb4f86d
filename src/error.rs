//! Error types for Siesta operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Siesta operations.
///
/// Provides detailed context about failures including invalid
/// hyperparameters and malformed report text.
///
/// # Examples
///
/// ```
/// use siesta::error::SiestaError;
///
/// let err = SiestaError::InvalidHyperparameter {
///     param: "prior_strength".to_string(),
///     value: "0".to_string(),
///     constraint: ">0".to_string(),
/// };
/// assert!(err.to_string().contains("Invalid hyperparameter"));
/// ```
#[derive(Debug)]
pub enum SiestaError {
    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Invalid or corrupt report format.
    FormatError {
        /// Error description
        message: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for SiestaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiestaError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            SiestaError::FormatError { message } => {
                write!(f, "Invalid report format: {message}")
            }
            SiestaError::Io(e) => write!(f, "I/O error: {e}"),
            SiestaError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            SiestaError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SiestaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SiestaError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SiestaError {
    fn from(err: std::io::Error) -> Self {
        SiestaError::Io(err)
    }
}

impl From<&str> for SiestaError {
    fn from(msg: &str) -> Self {
        SiestaError::Other(msg.to_string())
    }
}

impl From<String> for SiestaError {
    fn from(msg: String) -> Self {
        SiestaError::Other(msg)
    }
}

impl SiestaError {
    /// Create an invalid-hyperparameter error with descriptive context.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: f64, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: format!("{value}"),
            constraint: constraint.to_string(),
        }
    }

    /// Create a format error for a specific report line.
    #[must_use]
    pub fn bad_report_line(line_no: usize, detail: &str) -> Self {
        Self::FormatError {
            message: format!("line {line_no}: {detail}"),
        }
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for SiestaError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<SiestaError> for &str {
    fn eq(&self, other: &SiestaError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SiestaError>;
