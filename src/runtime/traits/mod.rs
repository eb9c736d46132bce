// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, RuntimeInfo and the FullRuntime umbrella.

mod container;
mod image;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;

/// Everything a cleanup pass needs from a runtime: image and container
/// listing plus removal.
///
/// Auto-implemented for any type providing both capabilities.
pub trait FullRuntime: ImageOps + ContainerOps {}

impl<T: ImageOps + ContainerOps> FullRuntime for T {}
