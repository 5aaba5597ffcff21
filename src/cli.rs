use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;

use crate::job::{LineRange, Substitution, Wildcard};
use crate::usage_error::UsageError;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "

Copyright (c) 2025 InkyQuill
License: MIT
Source: https://github.com/InkyQuill/wordsub
Rust Edition: 2024"
);

#[derive(Parser)]
#[command(name = "wordsub")]
#[command(about = "Copy a file, replacing whole words on the way")]
#[command(long_about = "Wordsub copies an input file to an output file, optionally replacing every
occurrence of a search word with a replacement word.

Matching is word-level, not substring-level: in exact mode words are
whitespace-delimited and must match the search text exactly. With --wildcard,
words are alphanumeric runs and the search text carries a single '*' at the
start ('*text' matches words ending in 'text') or at the end ('text*' matches
words starting with 'text').

A line range restricts where replacement happens; everything outside the
range is still copied unchanged. Without a search word, a line range selects
which lines are copied at all.

STDIN/STDOUT:
  Use '-' as the input or output file to read from stdin or write to stdout,
  e.g.: cat notes.txt | wordsub -i - -o - -s cat -r dog

EXAMPLES:
  wordsub -i in.txt -o out.txt                      Copy the file unchanged
  wordsub -i in.txt -o out.txt -s cat -r dog        Replace whole words
  wordsub -i in.txt -o out.txt -s 'pre*' -r X -w    Words starting with 'pre'
  wordsub -i in.txt -o out.txt -s '*fix' -r X -w    Words ending in 'fix'
  wordsub -i in.txt -o out.txt -l 10 20             Copy only lines 10-20
  wordsub -i in.txt -o out.txt -s a -r b -l 3 7     Replace only in lines 3-7")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = LONG_VERSION)]
struct Cli {
    /// Input file to read ('-' for stdin)
    #[arg(short = 'i', long, value_name = "FILE")]
    input: PathBuf,

    /// Output file to create or truncate ('-' for stdout)
    #[arg(short = 'o', long, value_name = "FILE")]
    output: PathBuf,

    /// Word to search for; must be paired with --replace
    #[arg(short = 's', long, value_name = "TEXT")]
    #[arg(help = "Word to search for (requires --replace)\nCase-sensitive, matches whole words only")]
    search: Option<String>,

    /// Replacement text, inserted verbatim
    #[arg(short = 'r', long, value_name = "TEXT")]
    replace: Option<String>,

    /// Treat the search text as a wildcard pattern
    #[arg(short = 'w', long)]
    #[arg(help = "Enable wildcard matching\nSearch text must be alphanumeric with one '*', either\n'*text' (suffix match) or 'text*' (prefix match)")]
    wildcard: bool,

    /// Restrict replacement (or copying) to an inclusive line range
    #[arg(short = 'l', long, num_args = 2, value_names = ["START", "END"])]
    #[arg(action = clap::ArgAction::Set)]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    #[arg(help = "Inclusive line range, 1-indexed\nWith --search: replace only within the range\nWithout: copy only the lines in the range")]
    lines: Option<Vec<u64>>,
}

/// Validated command line, ready to be turned into a copy job.
#[derive(Debug)]
pub struct Args {
    pub input: PathBuf,
    pub output: PathBuf,
    pub substitution: Option<Substitution>,
    pub range: Option<LineRange>,
}

pub fn parse_args() -> Result<Args> {
    parse_args_from(std::env::args_os())
}

/// Parse and validate an explicit argument list (unit-testable variant of
/// [`parse_args`]).
pub fn parse_args_from<I, T>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => return Err(usage_error_from_clap(&err).into()),
        },
    };
    validate(cli)
}

/// Fold clap's structural errors into the usage-error taxonomy so every
/// failure mode keeps its distinct exit code.
fn usage_error_from_clap(err: &clap::Error) -> UsageError {
    let arg = offending_arg(err);
    match err.kind() {
        ErrorKind::UnknownArgument => UsageError::UnrecognizedArgument {
            argument: arg.unwrap_or_else(|| first_line(err)),
        },
        ErrorKind::MissingRequiredArgument => UsageError::MissingRequiredOption {
            option: arg.unwrap_or_else(|| first_line(err)),
        },
        ErrorKind::WrongNumberOfValues | ErrorKind::TooManyValues | ErrorKind::TooFewValues => {
            UsageError::OptionArityMismatch {
                option: arg.unwrap_or_else(|| first_line(err)),
            }
        }
        ErrorKind::ArgumentConflict => UsageError::DuplicateOption {
            option: arg.unwrap_or_else(|| first_line(err)),
        },
        _ => UsageError::OptionValueInvalid {
            message: first_line(err),
        },
    }
}

fn offending_arg(err: &clap::Error) -> Option<String> {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => Some(s.clone()),
        Some(ContextValue::Strings(list)) => list.first().cloned(),
        _ => None,
    }
}

fn first_line(err: &clap::Error) -> String {
    err.to_string()
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}

fn validate(cli: Cli) -> Result<Args> {
    let substitution = match cli.search {
        Some(search) => {
            let pattern = if cli.wildcard {
                parse_wildcard(&search)?
            } else {
                if search.bytes().any(|b| b.is_ascii_whitespace()) {
                    return Err(UsageError::OptionValueInvalid {
                        message: "search text must not contain whitespace".to_string(),
                    }
                    .into());
                }
                Wildcard::Exact(search)
            };
            let replacement = cli.replace.ok_or(UsageError::DependentOptionMissing {
                missing: "--replace",
                present: "--search",
            })?;
            Some(Substitution {
                pattern,
                replacement,
            })
        }
        None => {
            if cli.replace.is_some() {
                return Err(UsageError::DependentOptionMissing {
                    missing: "--search",
                    present: "--replace",
                }
                .into());
            }
            if cli.wildcard {
                return Err(UsageError::DependentOptionMissing {
                    missing: "--search",
                    present: "--wildcard",
                }
                .into());
            }
            None
        }
    };

    let range = match cli.lines {
        Some(values) => {
            // num_args = 2 guarantees exactly two values here
            let (start, end) = (values[0], values[1]);
            if start > end {
                return Err(UsageError::OptionValueInvalid {
                    message: "starting line cannot be after end line".to_string(),
                }
                .into());
            }
            Some(LineRange { start, end })
        }
        None => None,
    };

    if !is_stdio(&cli.input) && !is_stdio(&cli.output) && same_file(&cli.input, &cli.output) {
        return Err(UsageError::SamePathConflict { path: cli.output }.into());
    }

    Ok(Args {
        input: cli.input,
        output: cli.output,
        substitution,
        range,
    })
}

/// Parse a wildcard search text: alphanumeric with exactly one `*`, at the
/// very start or the very end. The payload is sliced out here so the rest of
/// the program never sees the `*` again.
fn parse_wildcard(text: &str) -> Result<Wildcard, UsageError> {
    #[derive(PartialEq)]
    enum Position {
        Leading,
        Trailing,
    }

    let invalid = |message: &str| UsageError::OptionValueInvalid {
        message: message.to_string(),
    };

    let bytes = text.as_bytes();
    let mut position = None;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'*' {
            if i == 0 {
                position = Some(Position::Leading);
            } else if i == bytes.len() - 1 {
                if position == Some(Position::Leading) {
                    return Err(invalid("wildcard must be either prefix or postfix, not both"));
                }
                position = Some(Position::Trailing);
            } else {
                return Err(invalid("wildcard must be prefix or postfix"));
            }
        } else if !b.is_ascii_alphanumeric() {
            return Err(invalid("wildcard search text must be alphanumeric"));
        }
    }

    match position {
        Some(Position::Leading) => Ok(Wildcard::Prefix(text[1..].to_string())),
        Some(Position::Trailing) => Ok(Wildcard::Postfix(text[..text.len() - 1].to_string())),
        None => Err(invalid(
            "option --wildcard requires the search text to contain a wildcard",
        )),
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Whether two paths name the same underlying file. Plain equality first,
/// then canonicalization for paths that reach the same file another way.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Open the input read-only and the output create/truncate.
///
/// The same-path refusal has already happened in [`parse_args_from`], before
/// the output could be truncated.
pub fn open_streams(input: &Path, output: &Path) -> Result<(Box<dyn BufRead>, Box<dyn Write>)> {
    let reader: Box<dyn BufRead> = if is_stdio(input) {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input).map_err(|source| UsageError::StreamUnreadable {
            path: input.to_path_buf(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };

    let writer: Box<dyn Write> = if is_stdio(output) {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(output).map_err(|source| UsageError::StreamUnwritable {
            path: output.to_path_buf(),
            source,
        })?;
        Box::new(BufWriter::new(file))
    };

    Ok((reader, writer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        parse_args_from(std::iter::once("wordsub").chain(args.iter().copied()))
    }

    fn usage_error(result: Result<Args>) -> UsageError {
        result
            .expect_err("expected a usage error")
            .downcast::<UsageError>()
            .expect("expected a UsageError")
    }

    #[test]
    fn test_plain_copy_invocation() {
        let args = parse(&["-i", "in.txt", "-o", "out.txt"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.txt"));
        assert_eq!(args.output, PathBuf::from("out.txt"));
        assert!(args.substitution.is_none());
        assert!(args.range.is_none());
    }

    #[test]
    fn test_search_and_replace_invocation() {
        let args = parse(&["-i", "a", "-o", "b", "-s", "cat", "-r", "dog"]).unwrap();
        let sub = args.substitution.unwrap();
        assert_eq!(sub.pattern, Wildcard::Exact("cat".to_string()));
        assert_eq!(sub.replacement, "dog");
    }

    #[test]
    fn test_line_range_invocation() {
        let args = parse(&["-i", "a", "-o", "b", "-l", "3", "7"]).unwrap();
        assert_eq!(args.range, Some(LineRange { start: 3, end: 7 }));
    }

    #[test]
    fn test_missing_input_and_output() {
        let err = usage_error(parse(&[]));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_search_without_replace() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-s", "cat"]));
        assert!(matches!(
            err,
            UsageError::DependentOptionMissing {
                missing: "--replace",
                present: "--search",
            }
        ));
    }

    #[test]
    fn test_replace_without_search() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-r", "dog"]));
        assert!(matches!(
            err,
            UsageError::DependentOptionMissing {
                missing: "--search",
                present: "--replace",
            }
        ));
    }

    #[test]
    fn test_wildcard_without_search() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-w"]));
        assert!(matches!(
            err,
            UsageError::DependentOptionMissing {
                missing: "--search",
                present: "--wildcard",
            }
        ));
    }

    #[test]
    fn test_search_text_with_whitespace() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-s", "two words", "-r", "x"]));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_same_path_refused() {
        let err = usage_error(parse(&["-i", "f.txt", "-o", "f.txt"]));
        assert!(matches!(err, UsageError::SamePathConflict { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_stdio_markers_bypass_same_path_check() {
        let args = parse(&["-i", "-", "-o", "-"]).unwrap();
        assert!(is_stdio(&args.input));
        assert!(is_stdio(&args.output));
    }

    #[test]
    fn test_range_order_validated() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-l", "7", "3"]));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_range_rejects_zero() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-l", "0", "3"]));
        assert!(matches!(err, UsageError::OptionValueInvalid { .. }));
    }

    #[test]
    fn test_range_rejects_non_numeric() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-l", "x", "3"]));
        assert!(matches!(err, UsageError::OptionValueInvalid { .. }));
    }

    #[test]
    fn test_range_arity() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-l", "3"]));
        assert!(matches!(err, UsageError::OptionArityMismatch { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_unknown_flag() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-z"]));
        assert!(matches!(err, UsageError::UnrecognizedArgument { .. }));
        assert_eq!(err.exit_code(), 8);
    }

    #[test]
    fn test_duplicate_flag() {
        let err = usage_error(parse(&["-i", "a", "-i", "c", "-o", "b"]));
        assert!(matches!(err, UsageError::DuplicateOption { .. }));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_wildcard_prefix_payload_sliced() {
        let args = parse(&["-i", "a", "-o", "b", "-s", "*fix", "-r", "X", "-w"]).unwrap();
        let sub = args.substitution.unwrap();
        assert_eq!(sub.pattern, Wildcard::Prefix("fix".to_string()));
    }

    #[test]
    fn test_wildcard_postfix_payload_sliced() {
        let args = parse(&["-i", "a", "-o", "b", "-s", "pre*", "-r", "X", "-w"]).unwrap();
        let sub = args.substitution.unwrap();
        assert_eq!(sub.pattern, Wildcard::Postfix("pre".to_string()));
    }

    #[test]
    fn test_bare_star_is_empty_prefix_payload() {
        let args = parse(&["-i", "a", "-o", "b", "-s", "*", "-r", "X", "-w"]).unwrap();
        let sub = args.substitution.unwrap();
        assert_eq!(sub.pattern, Wildcard::Prefix(String::new()));
    }

    #[test]
    fn test_wildcard_on_both_ends_rejected() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-s", "*mid*", "-r", "X", "-w"]));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_wildcard_in_the_middle_rejected() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-s", "mi*d", "-r", "X", "-w"]));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_wildcard_requires_a_star() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-s", "plain", "-r", "X", "-w"]));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_wildcard_must_be_alphanumeric() {
        let err = usage_error(parse(&["-i", "a", "-o", "b", "-s", "*fi-x", "-r", "X", "-w"]));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_empty_search_text_without_wildcard_is_valid() {
        let args = parse(&["-i", "a", "-o", "b", "-s", "", "-r", "X"]).unwrap();
        let sub = args.substitution.unwrap();
        assert_eq!(sub.pattern, Wildcard::Exact(String::new()));
    }
}
