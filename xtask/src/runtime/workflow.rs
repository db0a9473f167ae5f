//! Stage reporting for multi-step workflows.

use crate::runtime::error::XtaskResult;
use std::time::{Duration, Instant};

/// Prints stage banners and timings for a workflow.
#[derive(Clone, Copy, Debug, Default)]
pub struct StageReporter;

impl StageReporter {
    /// Create a reporter.
    pub fn new() -> Self {
        Self
    }

    /// Run one named stage, reporting its outcome and duration.
    pub fn run_timed_stage<F>(&self, message: &str, action: F) -> XtaskResult<()>
    where
        F: FnOnce() -> XtaskResult<()>,
    {
        println!("\n==> {message}");
        let started = Instant::now();
        let result = action();
        let elapsed = format_duration(started.elapsed());
        match &result {
            Ok(()) => println!("    done in {elapsed}"),
            Err(_) => println!("    failed in {elapsed}"),
        }
        result
    }

    /// Print a non-fatal warning.
    pub fn warn(&self, message: &str) {
        println!("\n[warn] {message}");
    }
}

/// Format a duration for terminal output.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs >= 60 {
        let minutes = secs / 60;
        let rem_secs = secs % 60;
        format!("{minutes}m {rem_secs}.{millis:03}s")
    } else {
        format!("{secs}.{millis:03}s")
    }
}
