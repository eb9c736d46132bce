// ABOUTME: Resolves command-line flags into a single cleanup mode.
// ABOUTME: Validates size-limit arguments before any runtime is contacted.

use crate::types::{ParseSizeUnitError, SizeLimit, SizeLimitError, SizeUnit};
use thiserror::Error;

/// Invalid flag combination or value.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("--size-limit requires --unit (one of B, KB, MB, GB)")]
    MissingUnit,

    #[error("--unit requires --size-limit")]
    UnitWithoutLimit,

    #[error(transparent)]
    Unit(#[from] ParseSizeUnitError),

    #[error(transparent)]
    Limit(#[from] SizeLimitError),
}

/// Raw mode-selecting flags, as parsed.
#[derive(Debug, Clone, Default)]
pub struct ModeFlags {
    pub dry_run: bool,
    pub remove_stopped: bool,
    pub verbose: bool,
    pub size_limit: Option<f64>,
    pub unit: Option<String>,
    pub concurrent: bool,
}

/// What one invocation does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleanupMode {
    /// List unused images without removing anything.
    DryRun,
    /// Remove images whose only containers have exited, then those containers.
    RemoveStopped { concurrent: bool },
    /// Remove every unused image and report each one.
    Verbose,
    /// Remove unused images larger than the limit.
    SizeLimit(SizeLimit),
    /// Remove every unused image, stopping at the first failure unless concurrent.
    Prune { concurrent: bool },
}

impl CleanupMode {
    /// Pick the mode. Precedence: dry-run, remove-stopped, verbose, size-limit,
    /// then the default prune.
    ///
    /// Size-limit arguments are validated even when a higher-precedence flag
    /// wins, so a bad `--unit` is always reported.
    pub fn resolve(flags: &ModeFlags) -> Result<Self, UsageError> {
        let limit = match (flags.size_limit, flags.unit.as_deref()) {
            (Some(value), Some(unit)) => {
                let unit: SizeUnit = unit.parse()?;
                Some(SizeLimit::new(value, unit)?)
            }
            (Some(_), None) => return Err(UsageError::MissingUnit),
            (None, Some(_)) => return Err(UsageError::UnitWithoutLimit),
            (None, None) => None,
        };

        let mode = if flags.dry_run {
            CleanupMode::DryRun
        } else if flags.remove_stopped {
            CleanupMode::RemoveStopped {
                concurrent: flags.concurrent,
            }
        } else if flags.verbose {
            CleanupMode::Verbose
        } else if let Some(limit) = limit {
            CleanupMode::SizeLimit(limit)
        } else {
            CleanupMode::Prune {
                concurrent: flags.concurrent,
            }
        };

        Ok(mode)
    }

    /// Short name for logs and JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            CleanupMode::DryRun => "dry-run",
            CleanupMode::RemoveStopped { .. } => "remove-stopped",
            CleanupMode::Verbose => "verbose",
            CleanupMode::SizeLimit(_) => "size-limit",
            CleanupMode::Prune { .. } => "prune",
        }
    }

    /// Whether a removal failure makes the whole run fail.
    pub fn fails_on_removal_error(&self) -> bool {
        matches!(self, CleanupMode::Prune { .. })
    }
}
