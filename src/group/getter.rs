//! Data loader capability injected into each group.

use crate::error::LoadError;

/// Produces the authoritative value for a key on a cache miss.
pub trait Getter: Send + Sync {
    fn get(&self, key: &str) -> Result<Vec<u8>, LoadError>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> Result<Vec<u8>, LoadError> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>, LoadError> {
        self(key)
    }
}
