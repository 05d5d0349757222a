pub mod aggregate;
pub mod anomaly;
pub mod duplicate;
pub mod health;
pub mod normalize;

/// Canonical form used for grouping keys: case-folded, trimmed, inner
/// whitespace collapsed to single spaces.
pub(crate) fn canonicalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
