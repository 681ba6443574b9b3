// Error types for optuple

use std::error::Error;
use std::fmt;

/// Failures surfaced by option operations.
///
/// Absence is never an error: an `Opt::Absent` result is a normal outcome.
/// These variants only describe misuse of the API or type mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// A required argument was unusable, e.g. an unknown capture group
    InvalidArgument { param: &'static str, reason: String },
    /// A payload was extracted from an absent value
    InvalidState(String),
    /// A present payload could not be narrowed to the requested type
    InvalidCast { from: &'static str, to: &'static str },
    /// Two present payloads with no defined order were compared
    ComparisonNotSupported { type_name: &'static str },
}

impl OptionError {
    pub(crate) fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        OptionError::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter, when there is one
    pub fn param(&self) -> Option<&'static str> {
        match self {
            OptionError::InvalidArgument { param, .. } => Some(*param),
            _ => None,
        }
    }
}

impl Error for OptionError {}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::InvalidArgument { param, reason } => {
                write!(f, "Invalid argument '{}': {}", param, reason)
            }
            OptionError::InvalidState(msg) => {
                write!(f, "Invalid state: {}", msg)
            }
            OptionError::InvalidCast { from, to } => {
                write!(f, "Invalid cast: cannot convert {} to {}", from, to)
            }
            OptionError::ComparisonNotSupported { type_name } => {
                write!(
                    f,
                    "Comparison not supported: values of type {} have no defined order",
                    type_name
                )
            }
        }
    }
}
