//! Plain and Line-Range Copiers
//!
//! The two non-substituting copy modes: a byte-for-byte copy of the whole
//! stream, and an extraction copy that keeps only the lines of an inclusive
//! range. Both are single forward passes.

use std::io::{self, BufRead, Write};

use crate::job::LineRange;

/// Copy every byte from `input` to `output` until end of stream.
pub fn copy_plain<R, W>(input: &mut R, output: &mut W) -> io::Result<u64>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    io::copy(input, output)
}

/// Copy only the lines of `range` from `input` to `output`.
///
/// Lines are 1-indexed and counted by `\n` bytes. Lines before the range are
/// consumed without being written; lines within the range are written
/// including their terminators, the one closing the final line too. Nothing
/// past that terminator is consumed. End of stream before the range start
/// produces empty output.
pub fn copy_lines<R, W>(input: &mut R, output: &mut W, range: LineRange) -> io::Result<()>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    let mut line = Vec::new();
    let mut current = 1u64;

    while current < range.start {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.last() != Some(&b'\n') {
            // Unterminated final line: the stream ended before the range.
            return Ok(());
        }
        current += 1;
    }

    while current <= range.end {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        output.write_all(&line)?;
        if line.last() != Some(&b'\n') {
            return Ok(());
        }
        current += 1;
    }

    Ok(())
}
