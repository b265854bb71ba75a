//! The document store capability the registry engine is written against.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::HostMap;
use crate::types::RegistrySnapshot;

/// Document store primitives required by the registry engine.
///
/// These map directly onto common document-store "update with precondition"
/// and "field path update" operations; any backend offering them is
/// substitutable. Field paths are composed from the encoded hostname and the
/// pid, both treated as opaque path segments.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Fetch the document for `id`, creating it with an empty host map if
    /// absent (atomic upsert-on-read).
    async fn fetch_or_create(&self, id: &str) -> Result<RegistrySnapshot, StoreError>;

    /// Replace the whole document body with `hosts`, conditioned on the
    /// document being unchanged since `snapshot` was fetched.
    ///
    /// Returns the number of documents affected: 1 on commit, 0 when a
    /// concurrent writer got there first (a lost race, not an error).
    async fn replace_if_unchanged(&self, snapshot: &RegistrySnapshot, hosts: &HostMap) -> Result<u64, StoreError>;

    /// Atomically set the expiry of one `(host, pid)` slot.
    ///
    /// Creates the slot if the document exists but the slot does not.
    /// No-op when the document itself is absent (no upsert).
    async fn set_expiry(&self, id: &str, host: &str, pid: &str, expiry_secs: i64) -> Result<(), StoreError>;

    /// Atomically remove one `(host, pid)` slot.
    ///
    /// Idempotent: removing an absent slot or operating on an absent
    /// document is a no-op. Never prunes a hostname key left empty.
    async fn clear_slot(&self, id: &str, host: &str, pid: &str) -> Result<(), StoreError>;
}

// Blanket implementation for Arc<T>
#[async_trait]
impl<T: RegistryStore + ?Sized> RegistryStore for std::sync::Arc<T> {
    async fn fetch_or_create(&self, id: &str) -> Result<RegistrySnapshot, StoreError> {
        (**self).fetch_or_create(id).await
    }

    async fn replace_if_unchanged(&self, snapshot: &RegistrySnapshot, hosts: &HostMap) -> Result<u64, StoreError> {
        (**self).replace_if_unchanged(snapshot, hosts).await
    }

    async fn set_expiry(&self, id: &str, host: &str, pid: &str, expiry_secs: i64) -> Result<(), StoreError> {
        (**self).set_expiry(id, host, pid, expiry_secs).await
    }

    async fn clear_slot(&self, id: &str, host: &str, pid: &str) -> Result<(), StoreError> {
        (**self).clear_slot(id, host, pid).await
    }
}
