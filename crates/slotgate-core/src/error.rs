//! Error types for registry store backends.

use snafu::Snafu;

/// Errors from a [`crate::RegistryStore`] backend.
///
/// Transport failures are fatal to the calling operation: the registry has
/// no way to make progress without the store, so these propagate unchanged.
/// A lost optimistic race is NOT an error; it surfaces as an affected count
/// of zero from `replace_if_unchanged`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[snafu(display("store unavailable: {reason}"))]
    Unavailable {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A stored document could not be interpreted as a registry document.
    #[snafu(display("corrupted registry document '{id}': {reason}"))]
    Corrupted {
        /// Job id of the offending document.
        id: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// JSON serialization/deserialization error.
    #[snafu(display("serialization error: {source}"))]
    Serialization {
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(source: serde_json::Error) -> Self {
        StoreError::Serialization { source }
    }
}
