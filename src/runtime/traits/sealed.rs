// ABOUTME: Sealed trait pattern for runtime traits.
// ABOUTME: Only in-crate runtimes (bollard and the test double) may implement them.

/// Prevents implementations of the runtime traits outside this crate.
///
/// New methods can then be added to `ImageOps`/`ContainerOps` without a
/// breaking release.
pub trait Sealed {}
