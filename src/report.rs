// ABOUTME: Formatting helpers for human-readable cleanup reports.
// ABOUTME: Sizes, truncated IDs, labels, timestamps, and the verbose removal table.

use crate::cleanup::{ImageRemoval, RemovalOutcome};
use crate::runtime::ImageSummary;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use std::collections::HashMap;

/// Width of the ID column in the verbose table.
pub const ID_DISPLAY_WIDTH: usize = 32;

/// Format a byte count with binary units, e.g. `1.5 GB`.
///
/// ```
/// use dockclean::report::format_size;
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    let prefix = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {prefix}B", bytes as f64 / div as f64)
}

/// Shorten `id` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_id(id: &str, max_len: usize) -> String {
    if id.chars().count() <= max_len {
        return id.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let head: String = id.chars().take(keep).collect();
    format!("{head}...")
}

/// Render labels as `key:value` pairs sorted by key. Empty values print the key alone.
pub fn format_labels(labels: &HashMap<String, String>) -> String {
    if labels.is_empty() {
        return "No Labels Found".to_string();
    }

    let mut entries: Vec<_> = labels.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
        .into_iter()
        .map(|(key, value)| {
            if value.is_empty() {
                key.clone()
            } else {
                format!("{key}:{value}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// RFC 3339 creation time, or the raw seconds if out of range.
pub fn format_created(image: &ImageSummary) -> String {
    image
        .created_at()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| image.created.to_string())
}

pub fn create_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Table of per-image outcomes for verbose runs.
pub fn removal_table(removals: &[ImageRemoval]) -> Table {
    let mut table = create_styled_table();
    table.set_header(vec!["ID", "Size", "Created (RFC3339)", "Status", "Labels"]);

    for removal in removals {
        let status = match &removal.outcome {
            RemovalOutcome::Succeeded => "Removed",
            RemovalOutcome::Failed(_) => "Failed",
        };
        table.add_row(vec![
            truncate_id(removal.image.id.as_str(), ID_DISPLAY_WIDTH),
            format_size(removal.image.size),
            format_created(&removal.image),
            status.to_string(),
            format_labels(&removal.image.labels),
        ]);
    }

    table
}
