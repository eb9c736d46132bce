// ABOUTME: Removal orchestration for selected images and their cascaded containers.
// ABOUTME: Runs sequentially (abort or continue on failure) or on a bounded worker pool.

use crate::runtime::{FullRuntime, ImageSummary};
use crate::types::{ContainerId, ImageId};
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default cap on concurrent removals.
pub const DEFAULT_MAX_WORKERS: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => unreachable!(),
};

/// An image to remove, plus the containers to remove once the image is gone.
#[derive(Debug, Clone)]
pub struct RemovalTarget {
    pub image: ImageSummary,
    pub containers: Vec<ContainerId>,
}

impl From<ImageSummary> for RemovalTarget {
    fn from(image: ImageSummary) -> Self {
        Self {
            image,
            containers: Vec::new(),
        }
    }
}

/// Result of one image removal attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Succeeded,
    Failed(String),
}

impl RemovalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RemovalOutcome::Succeeded)
    }
}

/// Result of one cascaded container removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerOutcome {
    Removed,
    Failed(String),
    /// The image removal failed, so the container was left alone.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct ContainerRemoval {
    pub id: ContainerId,
    pub outcome: ContainerOutcome,
}

/// Everything that happened to one target.
#[derive(Debug, Clone)]
pub struct ImageRemoval {
    pub image: ImageSummary,
    pub outcome: RemovalOutcome,
    pub containers: Vec<ContainerRemoval>,
}

/// What to do when a sequential removal fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure. Remaining targets are not attempted.
    Abort,
    /// Attempt every target and report each outcome.
    Continue,
}

/// How targets are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalStrategy {
    /// One at a time, in input order.
    Sequential(FailurePolicy),
    /// At most `max_workers` removals in flight. Every target is attempted;
    /// outcomes arrive in completion order.
    Concurrent { max_workers: NonZeroUsize },
}

/// Aggregated outcome of a removal run.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    removals: Vec<ImageRemoval>,
    not_attempted: usize,
}

impl RunResult {
    /// Per-target outcomes in report order: input order for sequential runs,
    /// completion order for concurrent runs.
    pub fn removals(&self) -> &[ImageRemoval] {
        &self.removals
    }

    pub fn attempted(&self) -> usize {
        self.removals.len()
    }

    pub fn succeeded(&self) -> usize {
        self.removals
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Targets with no recorded outcome: skipped after a sequential abort, or
    /// lost when a concurrent worker panicked.
    pub fn not_attempted(&self) -> usize {
        self.not_attempted
    }

    /// Sum of the sizes of successfully removed images.
    pub fn reclaimed_bytes(&self) -> u64 {
        self.removals
            .iter()
            .filter(|r| r.outcome.is_success())
            .map(|r| r.image.size)
            .sum()
    }

    /// The first failure in report order. For concurrent runs this is the
    /// first failure to complete, not the first in input order.
    pub fn first_failure(&self) -> Option<(&ImageId, &str)> {
        self.removals.iter().find_map(|r| match &r.outcome {
            RemovalOutcome::Failed(reason) => Some((&r.image.id, reason.as_str())),
            RemovalOutcome::Succeeded => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.not_attempted == 0
    }

    pub fn containers_removed(&self) -> usize {
        self.count_containers(|o| matches!(o, ContainerOutcome::Removed))
    }

    pub fn containers_failed(&self) -> usize {
        self.count_containers(|o| matches!(o, ContainerOutcome::Failed(_)))
    }

    pub fn containers_skipped(&self) -> usize {
        self.count_containers(|o| matches!(o, ContainerOutcome::Skipped))
    }

    fn count_containers(&self, pred: impl Fn(&ContainerOutcome) -> bool) -> usize {
        self.removals
            .iter()
            .flat_map(|r| &r.containers)
            .filter(|c| pred(&c.outcome))
            .count()
    }
}

/// Removes targets through a shared runtime handle.
pub struct Remover<R> {
    runtime: Arc<R>,
    force: bool,
}

impl<R: FullRuntime + 'static> Remover<R> {
    pub fn new(runtime: Arc<R>, force: bool) -> Self {
        Self { runtime, force }
    }

    /// Remove `targets` with the given strategy.
    pub async fn remove(&self, targets: Vec<RemovalTarget>, strategy: RemovalStrategy) -> RunResult {
        match strategy {
            RemovalStrategy::Sequential(policy) => self.remove_sequential(targets, policy).await,
            RemovalStrategy::Concurrent { max_workers } => {
                self.remove_concurrent(targets, max_workers).await
            }
        }
    }

    async fn remove_sequential(
        &self,
        targets: Vec<RemovalTarget>,
        policy: FailurePolicy,
    ) -> RunResult {
        let total = targets.len();
        let mut removals = Vec::with_capacity(total);

        for target in targets {
            let removal = remove_target(self.runtime.as_ref(), target, self.force).await;
            let failed = !removal.outcome.is_success();
            removals.push(removal);

            if failed && policy == FailurePolicy::Abort {
                break;
            }
        }

        let not_attempted = total - removals.len();
        if not_attempted > 0 {
            warn!(not_attempted, "aborted removal after first failure");
        }

        RunResult {
            removals,
            not_attempted,
        }
    }

    async fn remove_concurrent(
        &self,
        targets: Vec<RemovalTarget>,
        max_workers: NonZeroUsize,
    ) -> RunResult {
        let total = targets.len();
        if total == 0 {
            return RunResult::default();
        }

        let queue = Arc::new(Mutex::new(VecDeque::from(targets)));
        // Sized to the number of targets so no worker ever waits on a full channel.
        let (tx, mut rx) = mpsc::channel::<ImageRemoval>(total);
        let workers = max_workers.get().min(total);

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let queue = Arc::clone(&queue);
                let tx = tx.clone();
                let runtime = Arc::clone(&self.runtime);
                let force = self.force;

                tokio::spawn(async move {
                    debug!(worker, "removal worker started");
                    loop {
                        let next = queue.lock().pop_front();
                        let Some(target) = next else { break };

                        let removal = remove_target(runtime.as_ref(), target, force).await;
                        if tx.send(removal).await.is_err() {
                            break;
                        }
                    }
                    debug!(worker, "removal worker finished");
                })
            })
            .collect();
        drop(tx);

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "removal worker panicked");
            }
        }

        let mut removals = Vec::with_capacity(total);
        while let Some(removal) = rx.recv().await {
            removals.push(removal);
        }

        // A panicked worker loses the target it was holding; the rest of the
        // queue is drained by the surviving workers.
        let not_attempted = total - removals.len();
        if not_attempted > 0 {
            warn!(not_attempted, "removal targets lost to panicked workers");
        }

        RunResult {
            removals,
            not_attempted,
        }
    }
}

/// Remove one image, then its containers if the image is gone.
async fn remove_target<R: FullRuntime + ?Sized>(
    runtime: &R,
    target: RemovalTarget,
    force: bool,
) -> ImageRemoval {
    let RemovalTarget { image, containers } = target;

    let outcome = match runtime.remove_image(&image.id, force).await {
        Ok(()) => {
            info!(image = %image.id, size = image.size, "removed image");
            RemovalOutcome::Succeeded
        }
        Err(e) => {
            warn!(image = %image.id, error = %e, "failed to remove image");
            RemovalOutcome::Failed(e.to_string())
        }
    };

    let mut container_removals = Vec::with_capacity(containers.len());
    for id in containers {
        let outcome = if outcome.is_success() {
            match runtime.remove_container(&id, force).await {
                Ok(()) => {
                    info!(container = %id, image = %image.id, "removed stopped container");
                    ContainerOutcome::Removed
                }
                Err(e) => {
                    warn!(container = %id, error = %e, "failed to remove stopped container");
                    ContainerOutcome::Failed(e.to_string())
                }
            }
        } else {
            debug!(container = %id, image = %image.id, "image kept, skipping container");
            ContainerOutcome::Skipped
        };
        container_removals.push(ContainerRemoval { id, outcome });
    }

    ImageRemoval {
        image,
        outcome,
        containers: container_removals,
    }
}
