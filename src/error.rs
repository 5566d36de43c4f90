//! Error types for the rule engine.

use std::fmt;

use crate::region::Region;

/// Result type alias for rule-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rule-engine operations.
///
/// All variants are recoverable: a failed upsert leaves the target rule
/// set exactly as it was.
#[derive(Debug)]
pub enum Error {
    /// The region carries no pattern rule list. Passing one of these is a
    /// programming error in the caller, not bad user input.
    UnknownRegion(Region),
    /// Malformed plain regular expression, with the regex engine's
    /// diagnostic.
    RegexCompile { pattern: String, message: String },
    /// Malformed search expression for an index rule, with the expression
    /// compiler's diagnostic.
    SearchCompile { pattern: String, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegion(region) => {
                write!(f, "no pattern rule list for region '{region}'")
            }
            Self::RegexCompile { pattern, message } => {
                write!(f, "invalid regex '{pattern}': {message}")
            }
            Self::SearchCompile { pattern, message } => {
                write!(f, "invalid search expression '{pattern}': {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
