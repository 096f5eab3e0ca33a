//! Error types for the `contagion-core` crate.
//!
//! All fallible container operations return [`RegistryError`] through the
//! standard [`Result`] type. Lookups (`find`, `get`) never fail; they return
//! [`Option`] instead.

use std::collections::TryReserveError;

/// Errors that can occur when mutating a table or list.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The backing storage could not grow to hold one more element.
    ///
    /// The container is left exactly as it was before the call.
    #[error("allocation failed: {source}")]
    Memory {
        /// The underlying reservation failure.
        #[from]
        source: TryReserveError,
    },

    /// An element with the same key is already stored.
    #[error("duplicated key: {0}")]
    Duplicated(String),

    /// No element matches the requested key.
    #[error("not found: {0}")]
    NotFound(String),

    /// The index is outside the range accepted by the operation.
    #[error("invalid index {index} for a list of {len} elements")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },

    /// A delete was attempted on an empty ranked list.
    #[error("the list is empty")]
    EmptyList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_key() {
        let err = RegistryError::Duplicated("rat".to_owned());
        assert_eq!(err.to_string(), "duplicated key: rat");

        let err = RegistryError::InvalidIndex { index: 6, len: 1 };
        assert_eq!(err.to_string(), "invalid index 6 for a list of 1 elements");
    }

    #[test]
    fn reserve_failures_convert_into_memory_errors() {
        let mut buffer: Vec<u64> = Vec::new();
        let failure = buffer.try_reserve_exact(usize::MAX);
        assert!(failure.is_err());
        if let Err(source) = failure {
            let err = RegistryError::from(source);
            assert!(matches!(err, RegistryError::Memory { .. }));
        }
    }
}
