//! Result type for lookups where a missing entity is an expected outcome.

/// Outcome of a lookup that treats "not found" as a normal answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The entity exists
    Found(T),
    /// The API reported no such entity
    NotFound,
}

impl<T> Lookup<T> {
    /// Whether the entity was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Convert into an `Option`.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(lookup: Lookup<T>) -> Self {
        lookup.found()
    }
}
