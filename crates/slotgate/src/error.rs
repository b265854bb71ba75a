//! Error types for the registry engine.

use slotgate_core::StoreError;
use snafu::Snafu;

/// Errors from registry operations.
///
/// A rejected or contended `acquire` is NOT an error - it returns
/// `Ok(false)`. Only caller mistakes and store failures surface here.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistryError {
    /// A parameter failed validation; no store interaction occurred.
    #[snafu(display("invalid argument '{parameter}': {reason}"))]
    InvalidArgument {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The backing store failed; propagated as-is, the registry cannot
    /// make progress without it.
    #[snafu(display("store error: {source}"))]
    Store {
        /// The underlying error.
        source: StoreError,
    },
}

impl From<StoreError> for RegistryError {
    fn from(source: StoreError) -> Self {
        RegistryError::Store { source }
    }
}
