// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Supports both Docker and Podman via Docker-compatible API.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    ContainerError, ContainerOps, ContainerState, ContainerSummary, ImageError, ImageOps,
    ImageSummary, RuntimeInfo, RuntimeInfoError, RuntimeMetadata,
};
use crate::runtime::types::{RuntimeInfo as DetectedRuntime, RuntimeType};
use crate::types::{ContainerId, ImageId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::ContainerSummaryStateEnum;
use bollard::query_parameters::{
    ListContainersOptions, ListImagesOptions, RemoveContainerOptions, RemoveImageOptions,
};
use std::time::Duration;

/// Placeholder tag older Docker daemons report for untagged images.
const UNTAGGED_PLACEHOLDER: &str = "<none>:<none>";

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_remove_error(e: bollard::errors::Error, image_id: &ImageId) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_id.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ImageError::InUse(format!("{}: {}", image_id, message)),
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image_id, e)),
    }
}

fn map_container_remove_error(e: bollard::errors::Error, id: &ContainerId) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ContainerError::NotFound(id.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::Conflict(format!("{}: {}", id, message)),
        _ => ContainerError::Runtime(format!("failed to remove {}: {}", id, e)),
    }
}

/// Map the API's state enum through its wire name.
fn container_state(state: ContainerSummaryStateEnum) -> ContainerState {
    ContainerState::parse(&state.to_string())
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
///
/// Supports both Docker and Podman via Docker-compatible API.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardRuntime {
    /// Create a new BollardRuntime from a Docker client.
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Connect to a container runtime using detected runtime info.
    ///
    /// Only opens the client; call [`BollardRuntime::negotiate`] before use so
    /// requests go out with an API version the daemon understands.
    pub fn connect(info: &DetectedRuntime, timeout: Duration) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(format!("{}: {}", info.socket_path, e)))?;
        Ok(Self::new(client, info.runtime_type))
    }

    /// Negotiate the API version with the daemon, downgrading if it is older
    /// than the client default.
    pub async fn negotiate(self) -> Result<Self, RuntimeInfoError> {
        let client = self
            .client
            .negotiate_version()
            .await
            .map_err(|e| RuntimeInfoError::Negotiation(e.to_string()))?;
        tracing::debug!(api_version = %client.client_version(), "negotiated API version");
        Ok(Self {
            client,
            runtime_type: self.runtime_type,
        })
    }

    /// Get the runtime type (Docker or Podman).
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }
}

// Implement Sealed trait to allow runtime trait implementations
impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let version = self
            .client
            .version()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(RuntimeMetadata {
            name,
            version: version.version.unwrap_or_default(),
            api_version: self.client.client_version().to_string(),
            os: version.os.unwrap_or_default(),
            arch: version.arch.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_images(&self, all: bool) -> Result<Vec<ImageSummary>, ImageError> {
        let opts = ListImagesOptions {
            all,
            ..Default::default()
        };

        let images = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(format!("failed to list images: {}", e)))?;

        Ok(images
            .into_iter()
            .map(|image| ImageSummary {
                id: ImageId::new(image.id),
                repo_tags: image
                    .repo_tags
                    .into_iter()
                    .filter(|tag| tag != UNTAGGED_PLACEHOLDER)
                    .collect(),
                size: u64::try_from(image.size).unwrap_or(0),
                created: image.created,
                labels: image.labels,
            })
            .collect())
    }

    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError> {
        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(id.as_str(), Some(opts), None)
            .await
            .map_err(|e| map_image_remove_error(e, id))?;

        Ok(())
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ContainerError> {
        let opts = ListContainersOptions {
            all,
            ..Default::default()
        };

        // Podman reports "stopping" as a container state during shutdown, but bollard
        // doesn't recognize it and fails deserialization. Retry after a short delay
        // since "stopping" is a transient state.
        let mut last_error = None;
        for attempt in 0..3 {
            match self.client.list_containers(Some(opts.clone())).await {
                Ok(containers) => {
                    return Ok(containers
                        .into_iter()
                        .map(|c| {
                            let name = c
                                .names
                                .unwrap_or_default()
                                .first()
                                .map(|n| n.trim_start_matches('/').to_string())
                                .unwrap_or_default();

                            let state = c
                                .state
                                .map(container_state)
                                .unwrap_or(ContainerState::Unknown);

                            ContainerSummary {
                                id: ContainerId::new(c.id.unwrap_or_default()),
                                name,
                                image: c.image.unwrap_or_default(),
                                image_id: ImageId::new(c.image_id.unwrap_or_default()),
                                state,
                            }
                        })
                        .collect());
                }
                Err(e) => {
                    let err_str = e.to_string();
                    if (err_str.contains("unknown variant `stopping`")
                        || err_str.contains("unknown variant `stopped`"))
                        && attempt < 2
                    {
                        tracing::debug!(attempt, "transient container state, retrying list");
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        last_error = Some(err_str);
                        continue;
                    }
                    return Err(ContainerError::Runtime(err_str));
                }
            }
        }

        Err(ContainerError::Runtime(
            last_error.unwrap_or_else(|| "list_containers failed".to_string()),
        ))
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(|e| map_container_remove_error(e, id))?;

        Ok(())
    }
}
