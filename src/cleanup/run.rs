// ABOUTME: One classify-then-act pass against a runtime.
// ABOUTME: Lists the inventory once, selects targets for the mode, and removes them.

use super::classify::classify;
use super::filter::{select_exceeding_size, select_unused};
use super::mode::CleanupMode;
use super::removal::{
    DEFAULT_MAX_WORKERS, FailurePolicy, RemovalStrategy, RemovalTarget, Remover, RunResult,
};
use crate::error::{Error, Result};
use crate::runtime::{FullRuntime, ImageSummary};
use crate::types::SizeLimit;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info};

/// Knobs that come from configuration rather than the mode.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    /// Force-remove images and containers.
    pub force: bool,
    /// Worker cap for concurrent removal.
    pub max_workers: NonZeroUsize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            force: true,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

/// What a pass did.
#[derive(Debug, Clone)]
pub enum Report {
    /// Images that would have been removed.
    DryRun { images: Vec<ImageSummary> },
    Removal { mode: CleanupMode, result: RunResult },
}

impl Report {
    pub fn result(&self) -> Option<&RunResult> {
        match self {
            Report::DryRun { .. } => None,
            Report::Removal { result, .. } => Some(result),
        }
    }
}

/// Run one cleanup pass.
///
/// Listing failures abort before anything is removed. Removal failures are
/// folded into the returned [`Report`]; deciding whether they fail the
/// invocation is left to the caller (see [`CleanupMode::fails_on_removal_error`]).
pub async fn execute<R: FullRuntime + 'static>(
    runtime: Arc<R>,
    mode: CleanupMode,
    options: ExecuteOptions,
) -> Result<Report> {
    debug!(mode = mode.name(), force = options.force, "starting cleanup pass");

    let (targets, strategy) = match mode {
        CleanupMode::DryRun => {
            let images = list_unused(runtime.as_ref()).await?;
            info!(count = images.len(), "dry run, nothing removed");
            return Ok(Report::DryRun { images });
        }
        CleanupMode::Prune { concurrent } => {
            let targets = into_targets(list_unused(runtime.as_ref()).await?);
            let strategy = if concurrent {
                RemovalStrategy::Concurrent {
                    max_workers: options.max_workers,
                }
            } else {
                RemovalStrategy::Sequential(FailurePolicy::Abort)
            };
            (targets, strategy)
        }
        CleanupMode::Verbose => {
            let targets = into_targets(list_unused(runtime.as_ref()).await?);
            (targets, RemovalStrategy::Sequential(FailurePolicy::Continue))
        }
        CleanupMode::SizeLimit(limit) => {
            let targets = select_by_size(list_unused(runtime.as_ref()).await?, limit);
            (targets, RemovalStrategy::Sequential(FailurePolicy::Continue))
        }
        CleanupMode::RemoveStopped { concurrent } => {
            let images = runtime.list_images(false).await.map_err(Error::ListImages)?;
            let containers = runtime
                .list_containers(true)
                .await
                .map_err(Error::ListContainers)?;
            debug!(
                images = images.len(),
                containers = containers.len(),
                "classifying inventory"
            );

            let targets = classify(images, &containers).removal_candidates();
            let strategy = if concurrent {
                RemovalStrategy::Concurrent {
                    max_workers: options.max_workers,
                }
            } else {
                RemovalStrategy::Sequential(FailurePolicy::Continue)
            };
            (targets, strategy)
        }
    };

    info!(targets = targets.len(), mode = mode.name(), "removing images");
    let result = Remover::new(runtime, options.force)
        .remove(targets, strategy)
        .await;

    Ok(Report::Removal { mode, result })
}

async fn list_unused<R: FullRuntime + ?Sized>(runtime: &R) -> Result<Vec<ImageSummary>> {
    let images = runtime.list_images(true).await.map_err(Error::ListImages)?;
    let total = images.len();
    let unused = select_unused(images);
    debug!(total, unused = unused.len(), "listed images");
    Ok(unused)
}

fn select_by_size(images: Vec<ImageSummary>, limit: SizeLimit) -> Vec<RemovalTarget> {
    let threshold = limit.to_bytes();
    debug!(%limit, threshold, "applying size limit");
    into_targets(select_exceeding_size(images, threshold))
}

fn into_targets(images: Vec<ImageSummary>) -> Vec<RemovalTarget> {
    images.into_iter().map(RemovalTarget::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::removal::ContainerOutcome;
    use crate::cleanup::testing::{FakeRuntime, container, image};
    use crate::runtime::ContainerState;
    use crate::types::SizeUnit;

    const MB: u64 = 1024 * 1024;

    fn removal(report: Report) -> RunResult {
        match report {
            Report::Removal { result, .. } => result,
            Report::DryRun { .. } => panic!("expected a removal report"),
        }
    }

    #[tokio::test]
    async fn prune_removes_untagged_and_keeps_tagged() {
        let runtime = Arc::new(
            FakeRuntime::new().with_images(vec![image("A", &[], MB), image("B", &["app:latest"], MB)]),
        );

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::Prune { concurrent: false },
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(result.succeeded(), 1);
        assert_eq!(runtime.removed_images(), vec!["A"]);
        assert_eq!(runtime.list_all_flags(), vec![true]);
    }

    #[tokio::test]
    async fn concurrent_prune_removes_every_untagged_image() {
        let runtime = Arc::new(FakeRuntime::new().with_images(vec![
            image("a", &[], MB),
            image("b", &[], MB),
            image("c", &["keep:1"], MB),
            image("d", &[], MB),
        ]));

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::Prune { concurrent: true },
                ExecuteOptions {
                    force: true,
                    max_workers: NonZeroUsize::new(2).unwrap(),
                },
            )
            .await
            .unwrap(),
        );

        assert_eq!(result.succeeded(), 3);
        let mut removed = runtime.removed_images();
        removed.sort();
        assert_eq!(removed, vec!["a", "b", "d"]);
    }

    #[tokio::test]
    async fn dry_run_removes_nothing() {
        let runtime = Arc::new(
            FakeRuntime::new().with_images(vec![image("a", &[], MB), image("b", &["x:1"], MB)]),
        );

        let report = execute(
            Arc::clone(&runtime),
            CleanupMode::DryRun,
            ExecuteOptions::default(),
        )
        .await
        .unwrap();

        let Report::DryRun { images } = report else {
            panic!("expected a dry-run report");
        };
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id.as_str(), "a");
        assert!(runtime.operations().is_empty());
    }

    #[tokio::test]
    async fn size_limit_boundary_is_strict() {
        let runtime = Arc::new(FakeRuntime::new().with_images(vec![
            image("small", &[], 400 * MB),
            image("large", &[], 600 * MB),
            image("exact", &[], 500 * MB),
            image("tagged", &["big:1"], 900 * MB),
        ]));
        let limit = SizeLimit::new(500.0, SizeUnit::Megabytes).unwrap();

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::SizeLimit(limit),
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(runtime.removed_images(), vec!["large"]);
        assert_eq!(result.reclaimed_bytes(), 600 * MB);
    }

    #[tokio::test]
    async fn verbose_continues_past_failures() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("a", &[], MB), image("b", &[], MB), image("c", &[], MB)])
                .fail_image("a"),
        );

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::Verbose,
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(result.failed(), 1);
        assert_eq!(result.succeeded(), 2);
        assert_eq!(runtime.removed_images(), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn sequential_prune_aborts_on_failure() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("a", &[], MB), image("b", &[], MB), image("c", &[], MB)])
                .fail_image("a"),
        );

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::Prune { concurrent: false },
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(result.not_attempted(), 2);
        assert!(runtime.removed_images().is_empty());
    }

    #[tokio::test]
    async fn remove_stopped_cascades_containers() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("old", &["old:1"], 10 * MB), image("live", &["live:1"], MB)])
                .with_containers(vec![
                    container("c1", "old", ContainerState::Exited),
                    container("c2", "old", ContainerState::Exited),
                    container("c3", "live", ContainerState::Running),
                ]),
        );

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::RemoveStopped { concurrent: false },
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(runtime.removed_images(), vec!["old"]);
        assert_eq!(runtime.removed_containers(), vec!["c1", "c2"]);
        assert_eq!(result.containers_removed(), 2);
        assert_eq!(runtime.list_all_flags(), vec![false]);
    }

    #[tokio::test]
    async fn remove_stopped_leaves_mixed_images_alone() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("img", &[], MB)])
                .with_containers(vec![
                    container("c1", "img", ContainerState::Exited),
                    container("c2", "img", ContainerState::Running),
                ]),
        );

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::RemoveStopped { concurrent: true },
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(result.attempted(), 0);
        assert!(runtime.operations().is_empty());
    }

    #[tokio::test]
    async fn remove_stopped_skips_containers_of_kept_images() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("img", &[], MB)])
                .with_containers(vec![container("c1", "img", ContainerState::Exited)])
                .fail_image("img"),
        );

        let result = removal(
            execute(
                Arc::clone(&runtime),
                CleanupMode::RemoveStopped { concurrent: false },
                ExecuteOptions::default(),
            )
            .await
            .unwrap(),
        );

        assert_eq!(
            result.removals()[0].containers[0].outcome,
            ContainerOutcome::Skipped
        );
        assert!(runtime.removed_containers().is_empty());
    }

    #[tokio::test]
    async fn image_listing_failure_aborts_before_removal() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("a", &[], MB)])
                .fail_image_listing(),
        );

        let err = execute(
            Arc::clone(&runtime),
            CleanupMode::Prune { concurrent: false },
            ExecuteOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ListImages(_)));
        assert!(runtime.operations().is_empty());
    }

    #[tokio::test]
    async fn container_listing_failure_aborts_before_removal() {
        let runtime = Arc::new(
            FakeRuntime::new()
                .with_images(vec![image("a", &[], MB)])
                .with_containers(vec![container("c1", "a", ContainerState::Exited)])
                .fail_container_listing(),
        );

        let err = execute(
            Arc::clone(&runtime),
            CleanupMode::RemoveStopped { concurrent: false },
            ExecuteOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ListContainers(_)));
        assert!(runtime.operations().is_empty());
    }

    #[tokio::test]
    async fn force_option_reaches_the_runtime() {
        let runtime = Arc::new(FakeRuntime::new().with_images(vec![image("a", &[], MB)]));

        execute(
            Arc::clone(&runtime),
            CleanupMode::Verbose,
            ExecuteOptions {
                force: false,
                max_workers: DEFAULT_MAX_WORKERS,
            },
        )
        .await
        .unwrap();

        assert_eq!(runtime.force_flags(), vec![false]);
    }
}
