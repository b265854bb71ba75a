//! Deterministic in-memory doubles for registry tests.
//!
//! Everything here mirrors the behavior of production collaborators without
//! network, disk, or real process-table I/O:
//!
//! - [`DeterministicRegistryStore`]: in-memory [`RegistryStore`] with
//!   revision-based conditional replace
//! - [`ConflictInjectingStore`]: wrapper that loses the optimistic race a
//!   scripted number of times, for exercising the retry loop
//! - [`StaticIdentity`], [`FixedClock`], [`ScriptedLiveness`]: controlled
//!   identity, time, and process table

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use slotgate_core::Clock;
use slotgate_core::HostMap;
use slotgate_core::LivenessProbe;
use slotgate_core::ProcessIdentity;
use slotgate_core::RegistrySnapshot;
use slotgate_core::RegistryStore;
use slotgate_core::StoreError;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
struct StoredDoc {
    revision: u64,
    hosts: HostMap,
}

/// In-memory deterministic implementation of [`RegistryStore`].
///
/// Stores documents in a HashMap with a per-document revision counter that
/// backs the conditional replace, matching the semantics a document store
/// provides through "update with precondition" operations. No persistence,
/// single process only.
#[derive(Default)]
pub struct DeterministicRegistryStore {
    inner: Mutex<HashMap<String, StoredDoc>>,
}

impl DeterministicRegistryStore {
    /// Create a new empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Install a document with the given host map, for test fixtures.
    pub async fn seed(&self, id: &str, hosts: HostMap) {
        let mut inner = self.inner.lock().await;
        let doc = inner.entry(id.to_string()).or_default();
        doc.revision += 1;
        doc.hosts = hosts;
    }

    /// Inspect the current document for `id`, if any.
    pub async fn snapshot(&self, id: &str) -> Option<RegistrySnapshot> {
        let inner = self.inner.lock().await;
        inner.get(id).map(|doc| RegistrySnapshot {
            id: id.to_string(),
            revision: doc.revision,
            hosts: doc.hosts.clone(),
        })
    }
}

#[async_trait]
impl RegistryStore for DeterministicRegistryStore {
    async fn fetch_or_create(&self, id: &str) -> Result<RegistrySnapshot, StoreError> {
        let mut inner = self.inner.lock().await;
        let doc = inner.entry(id.to_string()).or_insert_with(|| StoredDoc {
            revision: 1,
            hosts: HostMap::new(),
        });
        Ok(RegistrySnapshot {
            id: id.to_string(),
            revision: doc.revision,
            hosts: doc.hosts.clone(),
        })
    }

    async fn replace_if_unchanged(&self, snapshot: &RegistrySnapshot, hosts: &HostMap) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        match inner.get_mut(&snapshot.id) {
            Some(doc) if doc.revision == snapshot.revision => {
                doc.hosts = hosts.clone();
                doc.revision += 1;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn set_expiry(&self, id: &str, host: &str, pid: &str, expiry_secs: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(doc) = inner.get_mut(id) {
            doc.hosts.entry(host.to_string()).or_default().insert(pid.to_string(), expiry_secs);
            doc.revision += 1;
        }
        Ok(())
    }

    async fn clear_slot(&self, id: &str, host: &str, pid: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if let Some(doc) = inner.get_mut(id)
            && let Some(pids) = doc.hosts.get_mut(host)
            && pids.remove(pid).is_some()
        {
            doc.revision += 1;
        }
        Ok(())
    }
}

/// Store wrapper that loses the optimistic race a scripted number of times.
///
/// The first `conflicts` calls to `replace_if_unchanged` report zero
/// affected documents without applying anything, as if a concurrent writer
/// committed between the fetch and the replace. Everything else delegates.
pub struct ConflictInjectingStore<S: RegistryStore> {
    inner: S,
    remaining: AtomicU64,
}

impl<S: RegistryStore> ConflictInjectingStore<S> {
    /// Wrap `inner`, failing the next `conflicts` conditional replaces.
    pub fn new(inner: S, conflicts: u64) -> Self {
        Self {
            inner,
            remaining: AtomicU64::new(conflicts),
        }
    }
}

#[async_trait]
impl<S: RegistryStore> RegistryStore for ConflictInjectingStore<S> {
    async fn fetch_or_create(&self, id: &str) -> Result<RegistrySnapshot, StoreError> {
        self.inner.fetch_or_create(id).await
    }

    async fn replace_if_unchanged(&self, snapshot: &RegistrySnapshot, hosts: &HostMap) -> Result<u64, StoreError> {
        let remaining = self.remaining.load(Ordering::Relaxed);
        if remaining > 0 {
            // u64::MAX means "conflict forever"; don't count it down.
            if remaining != u64::MAX {
                self.remaining.store(remaining - 1, Ordering::Relaxed);
            }
            return Ok(0);
        }
        self.inner.replace_if_unchanged(snapshot, hosts).await
    }

    async fn set_expiry(&self, id: &str, host: &str, pid: &str, expiry_secs: i64) -> Result<(), StoreError> {
        self.inner.set_expiry(id, host, pid, expiry_secs).await
    }

    async fn clear_slot(&self, id: &str, host: &str, pid: &str) -> Result<(), StoreError> {
        self.inner.clear_slot(id, host, pid).await
    }
}

/// Fixed identity for simulating a particular process on a particular host.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    hostname: String,
    pid: u32,
}

impl StaticIdentity {
    /// Identity reporting the given raw hostname and pid.
    pub fn new(hostname: &str, pid: u32) -> Self {
        Self {
            hostname: hostname.to_string(),
            pid,
        }
    }
}

impl ProcessIdentity for StaticIdentity {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn pid(&self) -> u32 {
        self.pid
    }
}

/// Manually advanced clock.
#[derive(Debug, Default)]
pub struct FixedClock {
    now_secs: AtomicI64,
}

impl FixedClock {
    /// Clock frozen at `now_secs`.
    pub fn new(now_secs: i64) -> Self {
        Self {
            now_secs: AtomicI64::new(now_secs),
        }
    }

    /// Move the clock forward (or backward, with a negative delta).
    pub fn advance(&self, secs: i64) {
        self.now_secs.fetch_add(secs, Ordering::Relaxed);
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_secs: i64) {
        self.now_secs.store(now_secs, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn now_unix_secs(&self) -> i64 {
        self.now_secs.load(Ordering::Relaxed)
    }
}

/// Scripted process table: only explicitly registered pids are running.
#[derive(Debug, Default)]
pub struct ScriptedLiveness {
    running: StdMutex<HashSet<u32>>,
}

impl ScriptedLiveness {
    /// Table with no running pids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `pid` as running.
    pub fn set_running(&self, pid: u32) {
        self.running.lock().expect("liveness table poisoned").insert(pid);
    }

    /// Mark `pid` as dead.
    pub fn set_dead(&self, pid: u32) {
        self.running.lock().expect("liveness table poisoned").remove(&pid);
    }
}

impl LivenessProbe for ScriptedLiveness {
    fn is_running(&self, pid: u32) -> bool {
        self.running.lock().expect("liveness table poisoned").contains(&pid)
    }
}
