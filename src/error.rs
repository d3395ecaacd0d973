use std::convert::Infallible;
use std::error::Error;
use std::fmt;

/// Errors surfaced by the plate model. Every failure is returned
/// synchronously to the immediate caller; nothing is retried or swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlateError {
    /// Malformed quantity text: bad separator, non-numeric value, or an
    /// unrecognized unit token.
    Format(String),
    /// Address out of bounds (row, column or index beyond the geometry),
    /// or a requested volume above the per-well capacity.
    Range(String),
    /// Wrong dynamic shape of an argument, e.g. a label where an integer
    /// index is required, or a non-mapping handed to a property setter.
    Type(String),
}

impl Error for PlateError {}

impl fmt::Display for PlateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlateError::Format(msg) => write!(f, "format error: {msg}"),
            PlateError::Range(msg) => write!(f, "range error: {msg}"),
            PlateError::Type(msg) => write!(f, "type error: {msg}"),
        }
    }
}

// Lets an already-built Quantity pass through the same TryInto bound as
// fallible text parsing.
impl From<Infallible> for PlateError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
