// ABOUTME: Application-wide error types for dockclean.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::cleanup::UsageError;
use crate::runtime::{ConnectionError, ConnectionErrorKind, ContainerError, ImageError};
use crate::types::ImageId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("failed to list images: {0}")]
    ListImages(#[source] ImageError),

    #[error("failed to list containers: {0}")]
    ListContainers(#[source] ContainerError),

    #[error("failed to remove image {image}: {reason}")]
    Removal { image: ImageId, reason: String },

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Process exit status for this error: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }

    /// What the user can try next, for errors where there is something to try.
    pub fn hint(&self) -> Option<&'static str> {
        let Error::Connection(e) = self else {
            return None;
        };
        match e.kind() {
            ConnectionErrorKind::NoRuntimeFound => {
                Some("start Docker or Podman, or set `socket` in dockclean.yml")
            }
            ConnectionErrorKind::UnsupportedHost => {
                Some("point DOCKER_HOST at a unix:// socket or unset it")
            }
            ConnectionErrorKind::ConnectionFailed | ConnectionErrorKind::Negotiation => {
                Some("check that the daemon is running and its socket is readable")
            }
            ConnectionErrorKind::RuntimeOperation => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
