//! Workspace packaging and verification commands (`cargo xtask`).

use std::process::ExitCode;

fn main() -> ExitCode {
    xtask::exit_code(xtask::execute_from_env())
}
