//! Copy Job Configuration and Dispatch
//!
//! A [`CopyJob`] is the validated configuration the CLI layer hands to the
//! core: an optional substitution, an optional line range, and the token
//! buffer limit. [`run_copy`] performs the single blocking copy operation,
//! dispatching to exactly one of the three copy modes.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::copier::{copy_lines, copy_plain};
use crate::replacer::copy_replace;
use crate::tokenizer::DEFAULT_TOKEN_LIMIT;

/// Inclusive 1-indexed line range with `start <= end`.
///
/// Construction is the CLI layer's job; the core treats the bounds as
/// already validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u64,
    pub end: u64,
}

/// Search pattern with the wildcard already resolved.
///
/// The prefix/postfix payloads are stored with the `*` stripped, so matching
/// never has to look at the original flag text again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wildcard {
    /// Whole-word match against whitespace-delimited words.
    Exact(String),
    /// `*text`: matches alphanumeric words whose tail equals the payload.
    Prefix(String),
    /// `text*`: matches alphanumeric words whose head equals the payload.
    Postfix(String),
}

impl Wildcard {
    /// Whether `word` is replaced under this pattern.
    ///
    /// An empty payload (a bare `*`) matches every word, zero-length words
    /// included; the comparison is purely length-based.
    pub fn matches(&self, word: &[u8]) -> bool {
        match self {
            Wildcard::Exact(text) => word == text.as_bytes(),
            Wildcard::Prefix(payload) => word.ends_with(payload.as_bytes()),
            Wildcard::Postfix(payload) => word.starts_with(payload.as_bytes()),
        }
    }

    /// Whether this pattern uses the alphanumeric (wild) tokenizer.
    pub fn is_wild(&self) -> bool {
        !matches!(self, Wildcard::Exact(_))
    }
}

/// A search pattern together with its replacement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub pattern: Wildcard,
    /// Inserted verbatim in place of each matched word.
    pub replacement: String,
}

/// Validated configuration for one copy operation.
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub substitution: Option<Substitution>,
    pub range: Option<LineRange>,
    pub token_limit: usize,
}

impl Default for CopyJob {
    fn default() -> Self {
        Self {
            substitution: None,
            range: None,
            token_limit: DEFAULT_TOKEN_LIMIT,
        }
    }
}

/// What a completed copy did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Number of words replaced (0 for the plain and line-range modes).
    pub replaced: u64,
}

/// Run one copy operation to completion.
///
/// Exactly one of the three copy modes runs:
/// - no substitution, no range: plain byte copy;
/// - no substitution, range: line-range extraction;
/// - substitution (with or without range): the replacement scan.
///
/// I/O faults are fatal and propagate immediately; the output may be left
/// partially written. Tokenization and substitution never fail on their own.
pub fn run_copy<R, W>(mut input: R, output: &mut W, job: &CopyJob) -> Result<CopyOutcome>
where
    R: BufRead,
    W: Write,
{
    let replaced = match (&job.substitution, job.range) {
        (Some(substitution), range) => {
            copy_replace(input, output, substitution, range, job.token_limit)
                .context("copy failed during replacement scan")?
        }
        (None, Some(range)) => {
            copy_lines(&mut input, output, range).context("copy failed during line extraction")?;
            0
        }
        (None, None) => {
            copy_plain(&mut input, output).context("copy failed")?;
            0
        }
    };

    Ok(CopyOutcome { replaced })
}
