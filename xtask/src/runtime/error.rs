//! Failure type shared by `dist` and `verify`.
//!
//! Every failure carries a category that picks the process exit status, plus optional context
//! (the workflow that was running, the file it was touching, what to try next) rendered on
//! separate lines under the message.

use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::Path;

/// What kind of failure stopped a workflow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum XtaskErrorCategory {
    /// `dist.toml` or a crate manifest is unreadable or inconsistent.
    Config,
    /// A required tool or rustup target is missing.
    Environment,
    /// A child process could not be spawned.
    ProcessLaunch,
    /// A child process ran and failed.
    ProcessExit,
    /// Bad command-line input.
    Validation,
    /// Reading or writing packaging output failed.
    Io,
}

impl XtaskErrorCategory {
    /// Short tag shown as `error[<label>]`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Environment => "environment",
            Self::ProcessLaunch => "launch",
            Self::ProcessExit => "process",
            Self::Validation => "usage",
            Self::Io => "io",
        }
    }

    /// Exit status, following the BSD `sysexits.h` values where one fits.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Validation => 64,
            Self::Environment => 69,
            Self::ProcessLaunch => 71,
            Self::Io => 74,
            Self::Config => 78,
            Self::ProcessExit => 1,
        }
    }
}

/// A categorized workflow failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct XtaskError {
    /// Failure kind.
    pub category: XtaskErrorCategory,
    /// What went wrong.
    pub message: String,
    /// Workflow that was running (`dist`, `verify`).
    pub operation: Option<String>,
    /// File or directory involved.
    pub target: Option<String>,
    /// Suggested fix.
    pub hint: Option<String>,
}

/// Result alias used throughout the xtask crate.
pub type XtaskResult<T> = Result<T, XtaskError>;

impl XtaskError {
    /// Error of an explicit category.
    pub fn new(category: XtaskErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            operation: None,
            target: None,
            hint: None,
        }
    }

    /// [`XtaskErrorCategory::Config`] error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Config, message)
    }

    /// [`XtaskErrorCategory::Environment`] error.
    pub fn environment(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Environment, message)
    }

    /// [`XtaskErrorCategory::ProcessLaunch`] error.
    pub fn process_launch(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::ProcessLaunch, message)
    }

    /// [`XtaskErrorCategory::ProcessExit`] error.
    pub fn process_exit(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::ProcessExit, message)
    }

    /// [`XtaskErrorCategory::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Validation, message)
    }

    /// [`XtaskErrorCategory::Io`] error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(XtaskErrorCategory::Io, message)
    }

    /// Record the workflow name. An inner operation is kept if one was already set.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation.get_or_insert_with(|| operation.into());
        self
    }

    /// Record the path involved.
    pub fn with_path(mut self, path: &Path) -> Self {
        self.target = Some(path.display().to_string());
        self
    }

    /// Record a suggested fix.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for XtaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        let context = [
            ("during", &self.operation),
            ("path", &self.target),
            ("hint", &self.hint),
        ];
        for (label, value) in context {
            if let Some(value) = value {
                write!(f, "\n  {label}: {value}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for XtaskError {}

impl From<io::Error> for XtaskError {
    fn from(value: io::Error) -> Self {
        XtaskError::io(value.to_string())
    }
}

/// Attach an action and path to filesystem results.
pub trait IoContext<T> {
    /// Map the error to `failed to <action>: <cause>` with the path attached.
    fn io_context(self, action: &str, path: &Path) -> XtaskResult<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context(self, action: &str, path: &Path) -> XtaskResult<T> {
        self.map_err(|err| XtaskError::io(format!("failed to {action}: {err}")).with_path(path))
    }
}
