//! Shared process execution helpers.

use crate::runtime::error::{XtaskError, XtaskResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Shared process runner used by command modules.
///
/// Echoes commands in a stable `+ ...` format, runs them from a caller-provided directory, and
/// normalizes failures into [`XtaskError`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner.
    pub fn new() -> Self {
        Self
    }

    /// Whether `program --version` runs successfully.
    pub fn command_available(&self, program: &str) -> bool {
        self.command_succeeds(program, &["--version"])
    }

    /// Whether a command succeeds with the given arguments. Output is discarded.
    pub fn command_succeeds(&self, program: &str, args: &[&str]) -> bool {
        Command::new(program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Require a command to exist.
    pub fn ensure_command(&self, program: &str, hint: &str) -> XtaskResult<()> {
        if self.command_available(program) {
            Ok(())
        } else {
            Err(XtaskError::environment(format!(
                "required command `{program}` not found"
            ))
            .with_hint(hint))
        }
    }

    /// Whether the rustup target is installed. Missing rustup counts as not installed.
    pub fn rust_target_installed(&self, target: &str) -> bool {
        self.capture_stdout("rustup", &["target", "list", "--installed"])
            .map(|stdout| stdout.lines().any(|line| line.trim() == target))
            .unwrap_or(false)
    }

    /// Run a process with owned arguments, inheriting stdio.
    pub fn run_owned(&self, root: &Path, program: &str, args: Vec<String>) -> XtaskResult<()> {
        self.print_command(program, &args);
        let status = Command::new(program)
            .current_dir(root)
            .args(&args)
            .status()
            .map_err(|err| {
                XtaskError::process_launch(format!("failed to start `{program}`: {err}"))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(XtaskError::process_exit(format!(
                "`{program}` exited with status {status}"
            )))
        }
    }

    /// Run a process with borrowed arguments.
    pub fn run(&self, root: &Path, program: &str, args: &[&str]) -> XtaskResult<()> {
        self.run_owned(root, program, args.iter().map(ToString::to_string).collect())
    }

    /// Capture stdout of a check command, or `None` when it cannot run or fails.
    pub fn capture_stdout(&self, program: &str, args: &[&str]) -> Option<String> {
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Print a command in the stable `+ program args` format.
    pub fn print_command(&self, program: &str, args: &[String]) {
        if args.is_empty() {
            println!("+ {program}");
        } else {
            println!("+ {program} {}", args.join(" "));
        }
    }
}
