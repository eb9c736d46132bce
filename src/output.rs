// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use crate::cleanup::{ContainerOutcome, ImageRemoval, RemovalOutcome, RunResult};
use crate::report::{format_size, removal_table};
use crate::runtime::ImageSummary;
use crate::types::SizeLimit;
use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => self.emit(&JsonEvent::message("success", message, self.duration())),
        }
    }

    /// Print a non-fatal problem, such as one image that could not be removed.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => self.emit_err(&JsonEvent::message("warning", message, None)),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                self.emit_err(&JsonEvent::message("error", message, self.duration()))
            }
        }
    }

    /// Suggest a next step after an error.
    pub fn hint(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Hint: {message}"),
            OutputMode::Json => self.emit_err(&JsonEvent::message("hint", message, None)),
        }
    }

    /// List what a dry run would remove.
    pub fn dry_run(&self, images: &[ImageSummary]) {
        match self.mode {
            OutputMode::Normal => {
                if images.is_empty() {
                    println!("No unused images found.");
                    return;
                }
                println!("The following images would be removed:");
                for image in images {
                    println!("ID: {}, Created: {}", image.id, image.created);
                }
            }
            OutputMode::Quiet => {
                for image in images {
                    println!("{}", image.id);
                }
            }
            OutputMode::Json => {
                for image in images {
                    self.emit(&JsonImageEvent {
                        event: "would_remove",
                        id: image.id.as_str(),
                        size: image.size,
                        created: image.created,
                    });
                }
            }
        }
    }

    /// Report each removal as it is listed in `result`.
    ///
    /// Failures always go to stderr with the image and cause. With `table`,
    /// removed images are also shown in a table in normal mode.
    pub fn removals(&self, result: &RunResult, table: bool) {
        for removal in result.removals() {
            self.removal(removal);
        }

        if table && self.mode == OutputMode::Normal && result.attempted() > 0 {
            println!("{}", removal_table(result.removals()));
        }
    }

    fn removal(&self, removal: &ImageRemoval) {
        match &removal.outcome {
            RemovalOutcome::Succeeded => {
                if self.mode == OutputMode::Json {
                    self.emit(&JsonRemovalEvent::new(removal));
                } else {
                    self.progress(&format!("  → Removed image {}", removal.image.id));
                }
            }
            RemovalOutcome::Failed(reason) => {
                if self.mode == OutputMode::Json {
                    self.emit(&JsonRemovalEvent::new(removal));
                } else {
                    self.warning(&format!(
                        "failed to remove image {}: {reason}",
                        removal.image.id
                    ));
                }
            }
        }

        if self.mode == OutputMode::Json {
            return;
        }
        for container in &removal.containers {
            match &container.outcome {
                ContainerOutcome::Removed => {
                    self.progress(&format!("    → Removed container {}", container.id))
                }
                ContainerOutcome::Failed(reason) => self.warning(&format!(
                    "failed to remove container {}: {reason}",
                    container.id
                )),
                ContainerOutcome::Skipped => self.progress(&format!(
                    "    → Kept container {} (image not removed)",
                    container.id
                )),
            }
        }
    }

    /// Final line for a removal run.
    pub fn summary(&self, result: &RunResult) {
        if self.mode == OutputMode::Json {
            self.emit(&JsonSummary::new(result, self.duration()));
            return;
        }
        self.success(&summary_message(result));
    }

    /// Final line for a size-limited run.
    pub fn size_limit_summary(&self, result: &RunResult, limit: &SizeLimit) {
        let nothing_to_do = result.attempted() == 0 && result.not_attempted() == 0;
        if nothing_to_do && self.mode != OutputMode::Json {
            self.success(&format!("No unused images exceed the limit of {limit}"));
            return;
        }
        self.summary(result);
    }

    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }

    fn emit_err<T: Serialize>(&self, event: &T) {
        if let Ok(json) = serde_json::to_string(event) {
            eprintln!("{json}");
        }
    }
}

/// Human-readable totals for a removal run.
fn summary_message(result: &RunResult) -> String {
    let mut message = format!(
        "Removed {} image(s), {} failed (Total space freed: {})",
        result.succeeded(),
        result.failed(),
        format_size(result.reclaimed_bytes())
    );
    if result.not_attempted() > 0 {
        message.push_str(&format!(", {} not attempted", result.not_attempted()));
    }

    let removed = result.containers_removed();
    let failed = result.containers_failed();
    let skipped = result.containers_skipped();
    if removed + failed + skipped > 0 {
        message.push_str(&format!(
            "; stopped containers: {removed} removed, {failed} failed, {skipped} skipped"
        ));
    }
    message
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl<'a> JsonEvent<'a> {
    fn message(event: &'a str, message: &'a str, duration_secs: Option<f64>) -> Self {
        Self {
            event,
            message,
            duration_secs,
        }
    }
}

#[derive(Serialize)]
struct JsonImageEvent<'a> {
    event: &'a str,
    id: &'a str,
    size: u64,
    created: i64,
}

#[derive(Serialize)]
struct JsonRemovalEvent<'a> {
    event: &'a str,
    id: &'a str,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    containers: Vec<JsonContainer<'a>>,
}

impl<'a> JsonRemovalEvent<'a> {
    fn new(removal: &'a ImageRemoval) -> Self {
        let (event, error) = match &removal.outcome {
            RemovalOutcome::Succeeded => ("removed", None),
            RemovalOutcome::Failed(reason) => ("failed", Some(reason.as_str())),
        };
        Self {
            event,
            id: removal.image.id.as_str(),
            size: removal.image.size,
            error,
            containers: removal
                .containers
                .iter()
                .map(|c| {
                    let (status, error) = match &c.outcome {
                        ContainerOutcome::Removed => ("removed", None),
                        ContainerOutcome::Failed(reason) => ("failed", Some(reason.as_str())),
                        ContainerOutcome::Skipped => ("skipped", None),
                    };
                    JsonContainer {
                        id: c.id.as_str(),
                        status,
                        error,
                    }
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonContainer<'a> {
    id: &'a str,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    event: &'static str,
    succeeded: usize,
    failed: usize,
    not_attempted: usize,
    containers_removed: usize,
    containers_failed: usize,
    containers_skipped: usize,
    reclaimed_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

impl JsonSummary {
    fn new(result: &RunResult, duration_secs: Option<f64>) -> Self {
        Self {
            event: "summary",
            succeeded: result.succeeded(),
            failed: result.failed(),
            not_attempted: result.not_attempted(),
            containers_removed: result.containers_removed(),
            containers_failed: result.containers_failed(),
            containers_skipped: result.containers_skipped(),
            reclaimed_bytes: result.reclaimed_bytes(),
            duration_secs,
        }
    }
}
