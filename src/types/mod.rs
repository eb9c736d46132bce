// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Phantom-typed image/container IDs and size-limit units.

mod id;
mod size;

pub use id::{ContainerId, ImageId};
pub use size::{ParseSizeUnitError, SizeLimit, SizeLimitError, SizeUnit};
