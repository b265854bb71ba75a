//! Registry document types.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Maximum representable slot expiry in epoch seconds.
///
/// Expiries are clamped to the 32-bit signed range for interoperability with
/// document stores lacking 64-bit integer fidelity. Readers must treat stored
/// values as seconds since epoch in `[0, MAX_EXPIRY_SECS]`.
pub const MAX_EXPIRY_SECS: i64 = i32::MAX as i64;

/// Slot map for one registry document: encoded-hostname -> (pid -> expiry).
///
/// Pids are stored as strings because they are used as field-path segments
/// in the backing document store. Expiries are absolute epoch seconds,
/// clamped to [`MAX_EXPIRY_SECS`].
pub type HostMap = BTreeMap<String, BTreeMap<String, i64>>;

/// A fetched registry document together with its store revision.
///
/// The revision is opaque to the engine: it only flows back into
/// [`crate::RegistryStore::replace_if_unchanged`] to detect concurrent
/// modification. It is not a domain field and is never persisted inside
/// the document body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrySnapshot {
    /// Job id this document coordinates. Immutable after creation.
    pub id: String,
    /// Store-level version at fetch time, used as the CAS precondition.
    pub revision: u64,
    /// Claimed slots, keyed by encoded hostname then pid.
    pub hosts: HostMap,
}

impl RegistrySnapshot {
    /// Total number of claimed slots across all hosts.
    pub fn slot_count(&self) -> usize {
        self.hosts.values().map(|pids| pids.len()).sum()
    }

    /// Number of claimed slots under one encoded hostname.
    pub fn host_slot_count(&self, host: &str) -> usize {
        self.hosts.get(host).map(|pids| pids.len()).unwrap_or(0)
    }
}
