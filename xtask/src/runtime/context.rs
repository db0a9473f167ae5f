//! Shared command context passed into command families.

use crate::runtime::error::{XtaskError, XtaskResult};
use crate::runtime::process::ProcessRunner;
use crate::runtime::workflow::StageReporter;
use std::path::{Path, PathBuf};

/// Shared execution context for xtask command families.
#[derive(Clone, Debug)]
pub struct CommandContext {
    root: PathBuf,
    process: ProcessRunner,
    stages: StageReporter,
}

impl CommandContext {
    /// Create a new command context rooted at the current workspace.
    pub fn new() -> XtaskResult<Self> {
        Ok(Self {
            root: workspace_root()?,
            process: ProcessRunner::new(),
            stages: StageReporter::new(),
        })
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared process runner.
    pub fn process(&self) -> &ProcessRunner {
        &self.process
    }

    /// Shared stage reporter.
    pub fn stages(&self) -> &StageReporter {
        &self.stages
    }
}

fn workspace_root() -> XtaskResult<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| XtaskError::environment("xtask lives under workspace root"))
}
