//! Error taxonomy for option registration, decoding and validation.
//!
//! Every failure aborts the current [`process()`](crate::OptionManager::process)
//! call immediately and surfaces as one of these variants. Callers are
//! expected to match on the kind, print the message, and exit; the library
//! itself never prints.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing, validation and query errors.
///
/// Variants that concern a specific option carry the offending option text
/// (with its `-`/`--` marker where the user typed one); use
/// [`option_name`](Error::option_name) to read it uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bad option registration: empty name, illegal exclusivity combination,
    /// or duplicate name/alias.
    #[error("invalid option definition: {0}")]
    Definition(String),
    /// Unrecognized option token.
    #[error("invalid option: {0}")]
    InvalidOption(String),
    /// An argument failed a type, set or bound check, or was supplied to an
    /// option that takes none.
    #[error("invalid argument for option {option}: {reason}")]
    InvalidArgument {
        /// The option the bad argument belongs to.
        option: String,
        /// What was wrong with the argument.
        reason: String,
    },
    /// A required option was absent from the command line.
    #[error("option required: {0}")]
    RequiredOption(String),
    /// An option with a mandatory argument was given without one.
    #[error("argument required for option {0}")]
    RequiredArgument(String),
    /// An option that does not allow repetition appeared more than once.
    #[error("multiple option not allowed: {0}")]
    MultipleOption(String),
    /// A short-option cluster that cannot be resolved without guessing.
    #[error("ambiguous option construction: {0}")]
    AmbiguousOption(String),
    /// An exclusive option was combined with other options.
    #[error("option is exclusive: {0}")]
    ExclusiveOption(String),
    /// Two mutually incompatible options were both present.
    #[error("option {option} conflicts with option {other}")]
    Conflict {
        /// The option declaring the conflict.
        option: String,
        /// The conflicting option that was also present.
        other: String,
    },
    /// Index-based query outside the valid range.
    #[error("index {index} out of bounds (0..{len})")]
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of available entries.
        len: usize,
    },
    /// Positional argument count outside the configured range.
    #[error("{0}")]
    Length(String),
    /// A query requiring a completed parse was issued too early.
    #[error("options are unprocessed; call process() first")]
    Unprocessed,
}

impl Error {
    /// Returns the offending option text, if this error concerns one.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            Error::InvalidOption(name)
            | Error::RequiredOption(name)
            | Error::RequiredArgument(name)
            | Error::MultipleOption(name)
            | Error::AmbiguousOption(name)
            | Error::ExclusiveOption(name) => Some(name),
            Error::InvalidArgument { option, .. } | Error::Conflict { option, .. } => Some(option),
            Error::Definition(_)
            | Error::OutOfBounds { .. }
            | Error::Length(_)
            | Error::Unprocessed => None,
        }
    }
}
