// ABOUTME: Image eligibility filters for the unused-image cleanup modes.
// ABOUTME: Selects untagged images and, optionally, those above a size threshold.

use crate::runtime::ImageSummary;

/// Every image without a tag, in input order.
pub fn select_unused(images: Vec<ImageSummary>) -> Vec<ImageSummary> {
    images.into_iter().filter(ImageSummary::is_untagged).collect()
}

/// Every image strictly larger than `threshold_bytes`, in input order.
///
/// Expects the already-unused subset. An image of exactly `threshold_bytes`
/// is kept.
pub fn select_exceeding_size(images: Vec<ImageSummary>, threshold_bytes: u64) -> Vec<ImageSummary> {
    images
        .into_iter()
        .filter(|image| image.size > threshold_bytes)
        .collect()
}
