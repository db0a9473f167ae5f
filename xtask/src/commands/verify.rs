//! Standardized local verification workflow.

use crate::commands::dist::{load_dist_config, WASM_TARGET};
use crate::runtime::context::CommandContext;
use crate::runtime::error::{XtaskError, XtaskResult};
use crate::XtaskCommand;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum VerifyMode {
    Fast,
    Full,
}

/// Parsed `cargo xtask verify` options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VerifyOptions {
    pub(crate) mode: VerifyMode,
    pub(crate) show_help: bool,
}

/// `cargo xtask verify`
pub struct VerifyCommand;

impl XtaskCommand for VerifyCommand {
    type Options = VerifyOptions;

    fn parse(args: &[String]) -> XtaskResult<Self::Options> {
        parse_verify_options(args)
    }

    fn run(ctx: &CommandContext, options: Self::Options) -> XtaskResult<()> {
        if options.show_help {
            print_verify_usage();
            return Ok(());
        }
        run_verify(ctx, options.mode).map_err(|err| err.with_operation("verify"))
    }
}

fn parse_verify_options(args: &[String]) -> XtaskResult<VerifyOptions> {
    let mut options = VerifyOptions {
        mode: VerifyMode::Full,
        show_help: false,
    };
    let mut explicit_mode = false;
    for arg in args {
        let mode = match arg.as_str() {
            "fast" => VerifyMode::Fast,
            "full" => VerifyMode::Full,
            "--help" | "-h" => {
                options.show_help = true;
                continue;
            }
            other => {
                return Err(XtaskError::validation(format!(
                    "unknown verify argument: {other}"
                )))
            }
        };
        if explicit_mode {
            return Err(XtaskError::validation(
                "verify accepts a single mode (`fast` or `full`)",
            ));
        }
        explicit_mode = true;
        options.mode = mode;
    }
    Ok(options)
}

fn print_verify_usage() {
    eprintln!(
        "Usage: cargo xtask verify [fast|full]\n\
         \n\
         fast  rustfmt check, workspace tests, wasm compile check\n\
         full  fast checks plus clippy with warnings denied (default)\n"
    );
}

fn run_verify(ctx: &CommandContext, mode: VerifyMode) -> XtaskResult<()> {
    let root = ctx.root();
    let process = ctx.process();
    let stages = ctx.stages();

    stages.run_timed_stage("Rustfmt check", || {
        process.run(root, "cargo", &["fmt", "--all", "--", "--check"])
    })?;

    if mode == VerifyMode::Full {
        stages.run_timed_stage("Clippy (warnings denied)", || {
            process.run(
                root,
                "cargo",
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )
        })?;
    }

    stages.run_timed_stage("Workspace tests", || {
        process.run(root, "cargo", &["test", "--workspace"])
    })?;

    let package = load_dist_config(ctx)?.package;
    if process.rust_target_installed(WASM_TARGET) {
        stages.run_timed_stage(&format!("Wasm compile check ({package})"), || {
            process.run(
                root,
                "cargo",
                &["check", "-p", package.as_str(), "--target", WASM_TARGET],
            )
        })?;
    } else {
        stages.warn(&format!(
            "{WASM_TARGET} target not installed; skipping wasm compile check"
        ));
    }

    println!("\nverify ({}) passed", mode_token(mode));
    Ok(())
}

fn mode_token(mode: VerifyMode) -> &'static str {
    match mode {
        VerifyMode::Fast => "fast",
        VerifyMode::Full => "full",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_to_full() {
        let options = parse_verify_options(&[]).expect("parse");
        assert_eq!(options.mode, VerifyMode::Full);
        assert!(!options.show_help);
    }

    #[test]
    fn accepts_single_mode_and_help() {
        let options = parse_verify_options(&args(&["fast", "--help"])).expect("parse");
        assert_eq!(options.mode, VerifyMode::Fast);
        assert!(options.show_help);
    }

    #[test]
    fn rejects_multiple_modes_and_unknown_args() {
        assert!(parse_verify_options(&args(&["fast", "full"])).is_err());
        let err = parse_verify_options(&args(&["--with-desktop"])).expect_err("unknown");
        assert!(err.to_string().contains("--with-desktop"));
    }
}
