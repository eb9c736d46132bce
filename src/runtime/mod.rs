// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Detection, connection, and the capability traits the cleanup engine uses.

mod bollard;
mod detection;
mod error;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local, detect_runtime};
pub use error::{ConnectionError, ConnectionErrorKind};
pub use traits::{
    ContainerError, ContainerOps, ContainerState, ContainerSummary, FullRuntime, ImageError,
    ImageOps, ImageSummary, RuntimeInfo as RuntimeInfoTrait, RuntimeInfoError, RuntimeMetadata,
};
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};
