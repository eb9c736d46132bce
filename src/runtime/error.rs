// ABOUTME: Connection error type with SNAFU pattern.
// ABOUTME: Unifies detection, connection and negotiation failures for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

/// Failure to reach or negotiate with the container runtime. Always fatal.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConnectionError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("runtime connection failed: {source}"))]
    Connection { source: RuntimeInfoError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// No container runtime found on the system.
    NoRuntimeFound,
    /// DOCKER_HOST points somewhere we can't connect to.
    UnsupportedHost,
    /// Failed to connect to runtime socket.
    ConnectionFailed,
    /// Client and daemon could not agree on an API version.
    Negotiation,
    /// Runtime operation error.
    RuntimeOperation,
}

impl ConnectionError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ConnectionErrorKind {
        match self {
            ConnectionError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => ConnectionErrorKind::NoRuntimeFound,
                DetectionError::UnsupportedHost(_) => ConnectionErrorKind::UnsupportedHost,
            },
            ConnectionError::Connection { source } => match source {
                RuntimeInfoError::ConnectionFailed(_) => ConnectionErrorKind::ConnectionFailed,
                RuntimeInfoError::Negotiation(_) => ConnectionErrorKind::Negotiation,
                RuntimeInfoError::Runtime(_) => ConnectionErrorKind::RuntimeOperation,
            },
        }
    }
}

impl From<DetectionError> for ConnectionError {
    fn from(source: DetectionError) -> Self {
        ConnectionError::Detection { source }
    }
}

impl From<RuntimeInfoError> for ConnectionError {
    fn from(source: RuntimeInfoError) -> Self {
        ConnectionError::Connection { source }
    }
}
