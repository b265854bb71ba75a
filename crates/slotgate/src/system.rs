//! Default system providers: real hostname, pid, clock, and procfs liveness.

use std::path::Path;

use slotgate_core::Clock;
use slotgate_core::LivenessProbe;
use slotgate_core::ProcessIdentity;

/// Identity of the calling process, read from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl ProcessIdentity for SystemIdentity {
    fn hostname(&self) -> String {
        nix::unistd::gethostname()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string())
    }

    fn pid(&self) -> u32 {
        std::process::id()
    }
}

/// Wall-clock time source.
///
/// Falls back to 0 if system time is before the Unix epoch instead of
/// panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> i64 {
        use std::time::SystemTime;
        use std::time::UNIX_EPOCH;
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Liveness probe backed by procfs presence (Linux).
///
/// A pid is considered running iff `/proc/<pid>` exists. Other platforms
/// need their own [`LivenessProbe`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcfsLiveness;

impl LivenessProbe for ProcfsLiveness {
    fn is_running(&self, pid: u32) -> bool {
        Path::new("/proc").join(pid.to_string()).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_process_is_running() {
        assert!(ProcfsLiveness.is_running(std::process::id()));
    }

    #[test]
    fn absurd_pid_is_not_running() {
        // Linux pids top out at 2^22.
        assert!(!ProcfsLiveness.is_running(u32::MAX));
    }

    #[test]
    fn identity_reports_own_pid() {
        assert_eq!(SystemIdentity.pid(), std::process::id());
    }

    #[test]
    fn hostname_is_non_empty() {
        assert!(!SystemIdentity.hostname().is_empty());
    }

    #[test]
    fn clock_is_past_epoch() {
        assert!(SystemClock.now_unix_secs() > 0);
    }
}
