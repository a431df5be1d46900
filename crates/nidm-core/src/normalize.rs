//! Lookup-key normalization shared by the dictionary and the resolver.

/// Normalize a metric name for dictionary lookup.
///
/// Trims, collapses every internal whitespace run to a single ASCII space, and
/// lowercases (Unicode-aware). Dictionary keys and record keys must go through
/// this same function.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
