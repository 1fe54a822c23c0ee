//! Canonical join keys shared by every cross-source join.

/// Case-folds and trims `text` into the key used to join market names with
/// mention keywords.
///
/// An empty result means "no usable key"; callers must not join on it.
#[must_use]
pub fn canonical_key(text: &str) -> String {
    text.trim().to_lowercase()
}
