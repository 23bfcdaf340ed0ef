//! Cache key builders.
//!
//! Keys are opaque to the cache layer; these helpers keep the
//! `"{kind}/{id}"` convention consistent so two entity types never share a
//! key.

use std::fmt::Display;

/// Separator between the entity kind and its id.
pub const KIND_SEPARATOR: char = '/';

/// Build the key of one entity, e.g. `user/42`.
#[must_use]
pub fn entity_key(kind: &str, id: impl Display) -> String {
    format!("{}{}{}", kind, KIND_SEPARATOR, id)
}

/// Build the keys of several entities of the same kind.
#[must_use]
pub fn entity_keys<I, D>(kind: &str, ids: I) -> Vec<String>
where
    I: IntoIterator<Item = D>,
    D: Display,
{
    ids.into_iter().map(|id| entity_key(kind, id)).collect()
}

/// Returns `false` for keys that cannot identify anything (empty or blank).
#[must_use]
pub fn is_usable(key: &str) -> bool {
    !key.trim().is_empty()
}
