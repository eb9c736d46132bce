// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: ImageSummary, ContainerSummary, ContainerState, RuntimeMetadata.

use crate::types::{ContainerId, ImageId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Snapshot of one image as reported by the runtime.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    /// Image ID (usually `sha256:<hex>`).
    pub id: ImageId,
    /// Repository tags. Empty for untagged images.
    pub repo_tags: Vec<String>,
    /// Size in bytes.
    pub size: u64,
    /// Creation time as unix seconds.
    pub created: i64,
    /// Image labels.
    pub labels: HashMap<String, String>,
}

impl ImageSummary {
    /// An image nothing refers to by name.
    pub fn is_untagged(&self) -> bool {
        self.repo_tags.is_empty()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }
}

/// Snapshot of one container as reported by the runtime.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerSummary {
    /// Container ID.
    pub id: ContainerId,
    /// Container name, without the leading slash.
    pub name: String,
    /// Image reference the container was created from.
    pub image: String,
    /// ID of the image the container runs.
    pub image_id: ImageId,
    /// Current state.
    pub state: ContainerState,
}

/// Container lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    /// A state this crate does not know, e.g. Podman's transient `stopping`.
    Unknown,
}

impl ContainerState {
    /// Parse a runtime state string such as `exited` or `running`.
    pub fn parse(state: &str) -> Self {
        match state.trim().to_ascii_lowercase().as_str() {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            _ => ContainerState::Unknown,
        }
    }

    /// Only `exited` counts as stopped. `dead`, `created` and unknown states
    /// keep their image alive.
    pub fn is_exited(self) -> bool {
        self == ContainerState::Exited
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
            ContainerState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Runtime metadata.
#[derive(Debug, Clone)]
pub struct RuntimeMetadata {
    /// Runtime name (e.g., "Docker", "Podman").
    pub name: String,
    /// Runtime version.
    pub version: String,
    /// Negotiated API version.
    pub api_version: String,
    /// Operating system.
    pub os: String,
    /// Architecture.
    pub arch: String,
}
