// ABOUTME: The cleanup engine: eligibility filters, classification, and removal.
// ABOUTME: Filter and classifier are pure; only the remover talks to the runtime.

mod classify;
mod filter;
mod mode;
mod removal;
mod run;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{Classification, ClassificationState, classify};
pub use filter::{select_exceeding_size, select_unused};
pub use mode::{CleanupMode, ModeFlags, UsageError};
pub use removal::{
    ContainerOutcome, ContainerRemoval, DEFAULT_MAX_WORKERS, FailurePolicy, ImageRemoval,
    RemovalOutcome, RemovalStrategy, RemovalTarget, Remover, RunResult,
};
pub use run::{ExecuteOptions, Report, execute};
