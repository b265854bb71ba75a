//! The registry engine: acquire, release, and renew job slots.

use std::sync::Arc;

use slotgate_core::Clock;
use slotgate_core::LivenessProbe;
use slotgate_core::ProcessIdentity;
use slotgate_core::RegistryStore;
use slotgate_core::encode_hostname;
use tracing::debug;

use crate::error::RegistryError;
use crate::pure;
use crate::system::ProcfsLiveness;
use crate::system::SystemClock;
use crate::system::SystemIdentity;

/// Default bound on optimistic-concurrency retries in `acquire`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Tunables for a [`SlotRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// How many read-clean-check-write cycles `acquire` runs before
    /// giving up on contention.
    pub max_attempts: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Options for a single `acquire` call.
#[derive(Debug, Clone, Copy)]
pub struct AcquireOptions {
    /// Lease duration in minutes. The stored expiry is
    /// `now + minutes * 60`, saturating, clamped to `[0, MAX_EXPIRY_SECS]`.
    /// The default of `i64::MAX` clamps to the maximum: a slot that never
    /// expires on its own and is reclaimed only by the liveness check.
    pub minutes_before_expire: i64,
    /// Maximum concurrent slots across all hosts.
    pub max_global_slots: u32,
    /// Maximum concurrent slots on the caller's own host.
    pub max_host_slots: u32,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            minutes_before_expire: i64::MAX,
            max_global_slots: 1,
            max_host_slots: 1,
        }
    }
}

/// Coordinates concurrent job instances through a shared document store.
///
/// One registry document exists per job id, holding the claimed
/// `(hostname, pid)` slots. All mutual exclusion between callers comes from
/// the store's conditional-replace primitive; the engine holds no locks
/// across its store round trips, and distinct job ids never interact.
pub struct SlotRegistry<S: RegistryStore + ?Sized> {
    store: Arc<S>,
    identity: Arc<dyn ProcessIdentity>,
    liveness: Arc<dyn LivenessProbe>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
}

impl<S: RegistryStore + ?Sized> SlotRegistry<S> {
    /// Create a registry with the system providers (real hostname and pid,
    /// procfs liveness, wall clock).
    pub fn new(store: Arc<S>) -> Self {
        Self::with_providers(
            store,
            Arc::new(SystemIdentity),
            Arc::new(ProcfsLiveness),
            Arc::new(SystemClock),
            RegistryConfig::default(),
        )
    }

    /// Create a registry with explicit providers.
    ///
    /// Tests inject a fixed clock, a scripted process table, and a synthetic
    /// identity to drive staleness and race scenarios deterministically.
    pub fn with_providers(
        store: Arc<S>,
        identity: Arc<dyn ProcessIdentity>,
        liveness: Arc<dyn LivenessProbe>,
        clock: Arc<dyn Clock>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            store,
            identity,
            liveness,
            clock,
            config,
        }
    }

    /// Try to claim a slot for `id`.
    ///
    /// Returns `Ok(true)` when a slot was claimed. `Ok(false)` always means
    /// "no slot available right now, try again later", whether the cause
    /// was a genuine limit or losing the optimistic race
    /// [`RegistryConfig::max_attempts`] times; callers treat both
    /// identically, typically by skipping until the next scheduler tick.
    ///
    /// Each attempt fetches the document (creating it empty if absent),
    /// reclaims stale slots from a working copy, checks the limits against
    /// the cleaned counts, and commits the cleaned copy plus its own slot
    /// conditioned on the document being unchanged since the fetch. A
    /// rejected attempt commits nothing, including the cleaning.
    pub async fn acquire(&self, id: &str, options: AcquireOptions) -> Result<bool, RegistryError> {
        validate_id(id)?;
        let own_host = encode_hostname(&self.identity.hostname());
        let own_pid = self.identity.pid().to_string();

        for attempt in 0..self.config.max_attempts {
            let snapshot = self.store.fetch_or_create(id).await?;
            let now = self.clock.now_unix_secs();

            let mut hosts = snapshot.hosts.clone();
            pure::clean_hosts(&mut hosts, &own_host, &own_pid, now, &|pid| {
                // A pid key that does not parse cannot be probed; treat it
                // as dead so the garbage entry gets reclaimed.
                pid.parse::<u32>().map(|p| self.liveness.is_running(p)).unwrap_or(false)
            });

            let total = pure::total_slots(&hosts);
            let own = hosts.get(&own_host).map(|pids| pids.len()).unwrap_or(0);
            if total >= options.max_global_slots as usize || own >= options.max_host_slots as usize {
                debug!(id, total, own, "slot limits reached");
                return Ok(false);
            }

            let expiry = pure::clamp_expiry(now, options.minutes_before_expire);
            hosts.entry(own_host.clone()).or_default().insert(own_pid.clone(), expiry);

            match self.store.replace_if_unchanged(&snapshot, &hosts).await? {
                1 => {
                    debug!(id, host = own_host.as_str(), pid = own_pid.as_str(), expiry, "slot acquired");
                    return Ok(true);
                }
                _ => {
                    debug!(id, attempt, "lost optimistic race");
                }
            }
        }

        debug!(id, attempts = self.config.max_attempts, "acquire gave up on contention");
        Ok(false)
    }

    /// Give back this process's slot for `id`.
    ///
    /// A single atomic field removal: no read-modify-write cycle, no retry,
    /// idempotent when no slot exists. Deliberately never prunes a hostname
    /// key left empty; the next `acquire` cleaning pass does that.
    pub async fn release(&self, id: &str) -> Result<(), RegistryError> {
        validate_id(id)?;
        let own_host = encode_hostname(&self.identity.hostname());
        let own_pid = self.identity.pid().to_string();

        self.store.clear_slot(id, &own_host, &own_pid).await?;
        debug!(id, host = own_host.as_str(), pid = own_pid.as_str(), "slot released");
        Ok(())
    }

    /// Extend this process's lease on `id` before it lapses.
    ///
    /// Computes the clamped expiry exactly as `acquire` does, then performs
    /// a single atomic field set: no limit checks, no retry. Long-running
    /// holders call this periodically.
    pub async fn renew(&self, id: &str, minutes_before_expire: i64) -> Result<(), RegistryError> {
        validate_id(id)?;
        let own_host = encode_hostname(&self.identity.hostname());
        let own_pid = self.identity.pid().to_string();

        let expiry = pure::clamp_expiry(self.clock.now_unix_secs(), minutes_before_expire);
        self.store.set_expiry(id, &own_host, &own_pid, expiry).await?;
        debug!(id, host = own_host.as_str(), pid = own_pid.as_str(), expiry, "lease renewed");
        Ok(())
    }
}

fn validate_id(id: &str) -> Result<(), RegistryError> {
    if id.is_empty() {
        return Err(RegistryError::InvalidArgument {
            parameter: "id",
            reason: "must not be empty",
        });
    }
    Ok(())
}
