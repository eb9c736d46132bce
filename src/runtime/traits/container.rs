// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: List the container inventory and remove containers by ID.

use super::sealed::Sealed;
use super::shared_types::ContainerSummary;
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container operations needed by a cleanup pass.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// List containers. Without `all`, only running containers are returned.
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ContainerError>;

    /// Remove a container.
    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container cannot be removed: {0}")]
    Conflict(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
