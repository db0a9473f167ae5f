//! Workspace packaging and verification commands (`cargo xtask`).
//!
//! A small CLI layer over a shared runtime. Command modules own workflow policy while
//! [`runtime`] owns process execution, stage reporting, configuration loading, and errors.

pub mod cli;
pub mod commands;
pub mod runtime;

use crate::cli::TopLevelCommand;
use crate::commands::dist::DistCommand;
use crate::commands::verify::VerifyCommand;
use crate::runtime::context::CommandContext;
use crate::runtime::error::XtaskResult;

/// Shared contract for top-level command families.
///
/// [`XtaskCommand::parse`] is a pure translation from raw arguments into typed options; side
/// effects belong in [`XtaskCommand::run`].
pub trait XtaskCommand {
    /// Typed options produced by CLI parsing.
    type Options;

    /// Parse command-line arguments into typed options.
    fn parse(args: &[String]) -> XtaskResult<Self::Options>;

    /// Execute the command family using the shared runtime context.
    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()>;
}

/// Execute `xtask` with the current process arguments.
pub fn execute_from_env() -> XtaskResult<()> {
    let parsed = cli::parse(std::env::args().skip(1).collect())?;
    let ctx = CommandContext::new()?;

    match parsed {
        TopLevelCommand::Dist(args) => DistCommand::run(&ctx, DistCommand::parse(&args)?),
        TopLevelCommand::Verify(args) => VerifyCommand::run(&ctx, VerifyCommand::parse(&args)?),
        TopLevelCommand::Help => {
            cli::print_usage();
            Ok(())
        }
    }
}

/// Convert a command result into a process exit code, printing failures to stderr.
pub fn exit_code(result: XtaskResult<()>) -> std::process::ExitCode {
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {err}", err.category.label());
            std::process::ExitCode::from(err.category.exit_code())
        }
    }
}
