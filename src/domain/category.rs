//! Category names shared by the registry and the aggregator.

/// Fallback category that can never be removed.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Categories a fresh dashboard starts with.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Dues", "Event", UNCATEGORIZED];

pub(crate) fn default_category() -> String {
    UNCATEGORIZED.to_string()
}
