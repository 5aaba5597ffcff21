//! Replace Engine
//!
//! The line-range-aware replacement scanner. The scan runs as a three-phase
//! state machine over a single forward pass:
//!
//! 1. pre-range copy: when a range starting past line 1 is configured, raw
//!    line-counted copy up to the range start (content before the range is
//!    preserved, unlike the line-range copier which drops it);
//! 2. scanning: tokenized substitution, gated by the line counter;
//! 3. post-range drain: once the counter passes the range end, the rest of
//!    the stream is handed to the plain copier verbatim.

use std::io::{self, BufRead, Write};

use crate::copier::copy_plain;
use crate::job::{LineRange, Substitution};
use crate::tokenizer::{WordReader, WordRead};

/// Copy `input` to `output`, replacing every whole word matched by
/// `substitution`. Returns the number of words replaced.
///
/// With a range, substitution only applies while the current line is within
/// it; everything outside is copied unchanged. Boundary bytes are always
/// copied through as-is. The trailing drain runs unconditionally so no byte
/// is ever lost, even when the scan stops at the range cutoff.
pub fn copy_replace<R, W>(
    mut input: R,
    output: &mut W,
    substitution: &Substitution,
    range: Option<LineRange>,
    token_limit: usize,
) -> io::Result<u64>
where
    R: BufRead,
    W: Write,
{
    let mut current_line = 1u64;

    if let Some(range) = range {
        if !copy_until_line(&mut input, output, &mut current_line, range.start)? {
            return Ok(0);
        }
    }

    let mut reader = WordReader::with_limit(input, token_limit);
    let mut replaced = 0u64;

    loop {
        let outcome = if substitution.pattern.is_wild() {
            reader.read_wild_word()?
        } else {
            reader.read_word()?
        };

        // Overflow fragments are checked one at a time, same as complete
        // words; a match can never span more than one buffer.
        if substitution.pattern.matches(reader.word()) {
            output.write_all(substitution.replacement.as_bytes())?;
            replaced += 1;
        } else {
            output.write_all(reader.word())?;
        }

        match outcome {
            WordRead::Eof => break,
            WordRead::Overflow => {}
            WordRead::Boundary(boundary) => {
                output.write_all(&[boundary])?;
                if boundary == b'\n' {
                    if let Some(range) = range {
                        current_line += 1;
                        if current_line > range.end {
                            break;
                        }
                    }
                }
            }
        }
    }

    // Past the range end (or already at end of stream, where this is a
    // no-op): the rest of the stream is copied verbatim.
    copy_plain(&mut reader.into_inner(), output)?;

    Ok(replaced)
}

/// Raw copy of whole lines until `current_line` reaches `target`.
///
/// Returns `false` when the stream ends first, in which case the whole input
/// has been written unchanged.
fn copy_until_line<R, W>(
    input: &mut R,
    output: &mut W,
    current_line: &mut u64,
    target: u64,
) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let mut line = Vec::new();
    while *current_line < target {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(false);
        }
        output.write_all(&line)?;
        if line.last() != Some(&b'\n') {
            return Ok(false);
        }
        *current_line += 1;
    }
    Ok(true)
}
