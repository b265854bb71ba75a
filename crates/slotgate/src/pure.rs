//! Pure registry computation functions.
//!
//! Deterministic and side-effect free: time and liveness are passed
//! explicitly, arithmetic saturates instead of overflowing.

use slotgate_core::HostMap;
use slotgate_core::MAX_EXPIRY_SECS;

/// Compute the absolute expiry for a slot acquired or renewed now.
///
/// `now_secs + minutes * 60` in a saturating domain, clamped to
/// `[0, MAX_EXPIRY_SECS]`: a sum past the 32-bit signed maximum sticks at
/// that maximum, a sum below zero yields an already-expired slot that the
/// next cleaning pass reclaims.
#[inline]
pub fn clamp_expiry(now_secs: i64, minutes: i64) -> i64 {
    now_secs.saturating_add(minutes.saturating_mul(60)).clamp(0, MAX_EXPIRY_SECS)
}

/// Whether one slot entry is stale and must be reclaimed.
///
/// A slot is stale if its expiry has passed, or - for slots under the
/// caller's own hostname only - if its pid is no longer running or equals
/// the caller's own pid (a prior slot for this same process, superseded by
/// the incoming acquire). Liveness is never consulted for foreign hosts.
#[inline]
pub fn is_stale(
    host: &str,
    pid: &str,
    expiry_secs: i64,
    own_host: &str,
    own_pid: &str,
    now_secs: i64,
    own_alive: &dyn Fn(&str) -> bool,
) -> bool {
    if expiry_secs <= now_secs {
        return true;
    }
    if host != own_host {
        return false;
    }
    pid == own_pid || !own_alive(pid)
}

/// Remove all stale slots from `hosts` and prune hostnames left empty.
pub fn clean_hosts(hosts: &mut HostMap, own_host: &str, own_pid: &str, now_secs: i64, own_alive: &dyn Fn(&str) -> bool) {
    for (host, pids) in hosts.iter_mut() {
        pids.retain(|pid, expiry| !is_stale(host, pid, *expiry, own_host, own_pid, now_secs, own_alive));
    }
    hosts.retain(|_, pids| !pids.is_empty());
}

/// Total number of claimed slots across all hosts.
#[inline]
pub fn total_slots(hosts: &HostMap) -> usize {
    hosts.values().map(|pids| pids.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(entries: &[(&str, &str, i64)]) -> HostMap {
        let mut map = HostMap::new();
        for (host, pid, expiry) in entries {
            map.entry(host.to_string()).or_default().insert(pid.to_string(), *expiry);
        }
        map
    }

    const ALL_ALIVE: fn(&str) -> bool = |_| true;
    const NONE_ALIVE: fn(&str) -> bool = |_| false;

    #[test]
    fn clamp_expiry_normal_range() {
        assert_eq!(clamp_expiry(1_000, 60), 1_000 + 3_600);
    }

    #[test]
    fn clamp_expiry_overflow_sticks_at_max() {
        assert_eq!(clamp_expiry(1_000, i64::MAX), MAX_EXPIRY_SECS);
        assert_eq!(clamp_expiry(MAX_EXPIRY_SECS, 1), MAX_EXPIRY_SECS);
    }

    #[test]
    fn clamp_expiry_underflow_sticks_at_zero() {
        assert_eq!(clamp_expiry(1_000, i64::MIN), 0);
        assert_eq!(clamp_expiry(0, -1), 0);
    }

    #[test]
    fn clamp_expiry_exactly_at_max() {
        assert_eq!(clamp_expiry(MAX_EXPIRY_SECS - 60, 1), MAX_EXPIRY_SECS);
    }

    #[test]
    fn expired_entry_is_stale_on_any_host() {
        assert!(is_stale("other", "42", 100, "own", "1", 100, &ALL_ALIVE));
        assert!(is_stale("own", "42", 99, "own", "1", 100, &ALL_ALIVE));
    }

    #[test]
    fn foreign_host_future_entry_is_not_stale() {
        // Liveness must not be consulted for foreign hosts.
        assert!(!is_stale("other", "42", 200, "own", "1", 100, &NONE_ALIVE));
    }

    #[test]
    fn dead_local_pid_is_stale() {
        assert!(is_stale("own", "42", 200, "own", "1", 100, &NONE_ALIVE));
    }

    #[test]
    fn own_pid_is_always_superseded() {
        assert!(is_stale("own", "1", 200, "own", "1", 100, &ALL_ALIVE));
    }

    #[test]
    fn clean_prunes_empty_hostnames() {
        let mut map = hosts(&[("a", "1", 50), ("b", "2", 200)]);
        clean_hosts(&mut map, "own", "9", 100, &ALL_ALIVE);
        assert!(!map.contains_key("a"));
        assert_eq!(map.get("b").map(|p| p.len()), Some(1));
    }

    #[test]
    fn clean_keeps_live_foreign_and_local_entries() {
        let mut map = hosts(&[("own", "2", 200), ("other", "3", 200)]);
        clean_hosts(&mut map, "own", "1", 100, &ALL_ALIVE);
        assert_eq!(total_slots(&map), 2);
    }

    #[test]
    fn total_slots_sums_all_hosts() {
        let map = hosts(&[("a", "1", 1), ("a", "2", 1), ("b", "3", 1)]);
        assert_eq!(total_slots(&map), 3);
    }
}
