mod cli;
mod config;
mod copier;
mod job;
mod logger;
mod replacer;
mod tokenizer;
mod usage_error;

use std::io::Write;
use std::process;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::job::CopyJob;
use crate::usage_error::UsageError;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<UsageError>()
        .map(UsageError::exit_code)
        .unwrap_or(1)
}

fn run() -> Result<()> {
    let args = cli::parse_args()?;

    let cfg = config::load_config()?;
    config::validate_config(&cfg)?;

    if let Some(log_path) = logger::init_debug_logging(cfg.debug_logging())? {
        debug!(log = %log_path.display(), "debug logging enabled");
    }

    let job = CopyJob {
        substitution: args.substitution,
        range: args.range,
        token_limit: cfg.token_limit(),
    };

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        replacing = job.substitution.is_some(),
        ranged = job.range.is_some(),
        "starting copy"
    );

    let (input, mut output) = cli::open_streams(&args.input, &args.output)?;
    let outcome = job::run_copy(input, &mut output, &job)?;
    output.flush().context("failed to flush output")?;

    info!(replaced = outcome.replaced, "copy complete");
    Ok(())
}
