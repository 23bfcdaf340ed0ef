//! Stored and looked-up forms of a cache entry.

/// What a backend holds for a key.
///
/// Absence is the lack of a stored value; a confirmed miss is recorded as
/// [`CachedValue::Null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    /// A JSON-encoded value.
    Value(String),
    /// The backing store was asked and had nothing for this key.
    Null,
}

impl CachedValue {
    /// Returns `true` for the negative-cache marker.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Result of a typed cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry<T> {
    /// Nothing is cached for the key.
    Absent,
    /// A previously produced value.
    Value(T),
    /// A previous lookup confirmed there is no value.
    Null,
}

impl<T> CacheEntry<T> {
    /// Returns `true` if nothing is cached.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for a cached confirmed miss.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the cached value, if any.
    ///
    /// Both `Absent` and `Null` map to `None`; use [`is_null`](Self::is_null)
    /// first when the distinction matters.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Maps the cached value, keeping `Absent` and `Null` as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CacheEntry<U> {
        match self {
            Self::Value(value) => CacheEntry::Value(f(value)),
            Self::Absent => CacheEntry::Absent,
            Self::Null => CacheEntry::Null,
        }
    }
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self::Absent
    }
}
