//! Binary entrypoint for the `capslot` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match capslot::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
