use anyhow::Result;
use modelfetch_core::logging::{self, LogDestination};

mod cli;

use crate::cli::Cli;

/// 0 only when every artifact is present and verified.
fn exit_code(outcome: &Result<bool>) -> i32 {
    match outcome {
        Ok(true) => 0,
        Ok(false) | Err(_) => 1,
    }
}

fn main() {
    let logs = logging::init();

    let outcome = Cli::run_from_args();
    if let Err(err) = &outcome {
        tracing::error!("fatal: {:#}", err);
        eprintln!("modelfetch error: {:#}", err);
        if let LogDestination::File(path) = &logs {
            eprintln!("see {} for details", path.display());
        }
    }
    std::process::exit(exit_code(&outcome));
}
