//! CLI entry point for paw.

use std::process::ExitCode;

use paw::run;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => error.exit_code(),
    }
}
