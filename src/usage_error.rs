//! Usage Error Taxonomy
//!
//! Typed errors for everything that can go wrong before the copy starts:
//! flag validation and stream opening. Each kind carries the process exit
//! code the tool reports, so scripts can tell failure modes apart.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// A validation or stream-open failure.
#[derive(Debug)]
pub enum UsageError {
    /// The input file could not be opened for reading.
    StreamUnreadable { path: PathBuf, source: io::Error },
    /// The output file could not be opened for writing.
    StreamUnwritable { path: PathBuf, source: io::Error },
    /// Input and output resolve to the same underlying file.
    SamePathConflict { path: PathBuf },
    /// A required option was not provided.
    MissingRequiredOption { option: String },
    /// An option is only valid together with another one that is absent.
    DependentOptionMissing {
        missing: &'static str,
        present: &'static str,
    },
    /// An option received the wrong number of values.
    OptionArityMismatch { option: String },
    /// An option value failed validation.
    OptionValueInvalid { message: String },
    /// An option was given more than once.
    DuplicateOption { option: String },
    /// An argument that is not a recognized option.
    UnrecognizedArgument { argument: String },
}

impl UsageError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            UsageError::StreamUnreadable { .. } => 1,
            UsageError::StreamUnwritable { .. } => 2,
            UsageError::SamePathConflict { .. } => 2,
            UsageError::MissingRequiredOption { .. } => 3,
            UsageError::DependentOptionMissing { .. } => 4,
            UsageError::OptionArityMismatch { .. } => 5,
            UsageError::OptionValueInvalid { .. } => 6,
            UsageError::DuplicateOption { .. } => 7,
            UsageError::UnrecognizedArgument { .. } => 8,
        }
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::StreamUnreadable { path, .. } => {
                write!(f, "failed to open {} for reading", path.display())
            }
            UsageError::StreamUnwritable { path, .. } => {
                write!(f, "cannot write to {}", path.display())
            }
            UsageError::SamePathConflict { path } => {
                write!(f, "input and output are the same file: {}", path.display())
            }
            UsageError::MissingRequiredOption { option } => {
                write!(f, "required option {option} not provided")
            }
            UsageError::DependentOptionMissing { missing, present } => {
                write!(f, "option {missing} must be present when {present} is present")
            }
            UsageError::OptionArityMismatch { option } => {
                write!(f, "wrong number of values for option {option}")
            }
            UsageError::OptionValueInvalid { message } => write!(f, "{message}"),
            UsageError::DuplicateOption { option } => {
                write!(f, "option {option} given more than once")
            }
            UsageError::UnrecognizedArgument { argument } => {
                write!(f, "unrecognized argument {argument}")
            }
        }
    }
}

impl Error for UsageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UsageError::StreamUnreadable { source, .. }
            | UsageError::StreamUnwritable { source, .. } => Some(source),
            _ => None,
        }
    }
}
