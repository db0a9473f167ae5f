//! Top-level CLI parsing and help output.

use crate::runtime::error::{XtaskError, XtaskResult};

/// Top-level `xtask` command families.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TopLevelCommand {
    Dist(Vec<String>),
    Verify(Vec<String>),
    Help,
}

/// Parse raw command-line arguments into a top-level command selection.
pub fn parse(args: Vec<String>) -> XtaskResult<TopLevelCommand> {
    let Some(cmd) = args.first().cloned() else {
        return Ok(TopLevelCommand::Help);
    };

    let rest = args[1..].to_vec();
    match cmd.as_str() {
        "dist" => Ok(TopLevelCommand::Dist(rest)),
        "verify" => Ok(TopLevelCommand::Verify(rest)),
        "help" | "--help" | "-h" => Ok(TopLevelCommand::Help),
        other => Err(XtaskError::validation(format!(
            "unknown xtask command: {other}"
        ))
        .with_hint("run `cargo xtask help`")),
    }
}

/// Print the canonical top-level usage text.
pub fn print_usage() {
    eprintln!(
        "Usage: cargo xtask <command> [args]\n\
         \n\
         Commands:\n\
           dist [--dev] [--out-dir <path>] [--no-minify]\n\
                              Package the activity indicator as ESM/CommonJS modules\n\
           verify [fast|full]  Run formatting, lint, and test checks (default: full)\n"
    );
}
