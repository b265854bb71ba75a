//! Host identity, liveness, and time providers.
//!
//! These are trivial in production but must be injectable: staleness,
//! expiry clamping, and pid-recycling scenarios are only testable with a
//! controlled clock, identity, and process table.

/// Whether a local process id is currently running.
///
/// Queried only for pids claimed under the caller's own hostname; the
/// registry never probes liveness of processes on other hosts.
pub trait LivenessProbe: Send + Sync {
    /// Returns true if `pid` is present in the local process table.
    fn is_running(&self, pid: u32) -> bool;
}

/// The calling process's hostname and pid.
pub trait ProcessIdentity: Send + Sync {
    /// Raw (unencoded) hostname of this machine.
    fn hostname(&self) -> String;

    /// Pid of the calling process.
    fn pid(&self) -> u32;
}

/// Wall-clock time source, whole-second precision.
pub trait Clock: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now_unix_secs(&self) -> i64;
}
