//! Distributed job-slot registry built on document-store CAS operations.
//!
//! `slotgate` lets independent processes across many hosts coordinate how
//! many concurrent instances of a logically-identified job may run, with a
//! shared document store as the only coordination medium. The typical caller
//! is a script fired repeatedly by a scheduler on a fleet of machines: it
//! skips its work when too many instances are already active globally or on
//! its own host, and the registry self-heals when a prior instance died or
//! hung (dead local pid, expired lease, recycled pid).
//!
//! All coordination happens through the [`slotgate_core::RegistryStore`]
//! conditional-replace primitive; there are no in-process locks, background
//! threads, or peer-to-peer channels. Writers never block - they retry a
//! bounded number of times or give up until the next scheduler tick.
//!
//! ## Example
//!
//! ```ignore
//! use slotgate::{AcquireOptions, SlotRegistry};
//!
//! let registry = SlotRegistry::new(store);
//!
//! let admitted = registry
//!     .acquire("nightly-report", AcquireOptions {
//!         minutes_before_expire: 60,
//!         max_global_slots: 3,
//!         max_host_slots: 1,
//!     })
//!     .await?;
//!
//! if admitted {
//!     // ... do the work, optionally registry.renew(...) along the way ...
//!     registry.release("nightly-report").await?;
//! }
//! ```
//!
//! A `false` return from `acquire` always means "no slot available right
//! now, try again later" - callers treat a genuine limit and a losing race
//! identically.

mod error;
pub mod pure;
mod registry;
mod system;

pub use error::RegistryError;
pub use registry::AcquireOptions;
pub use registry::DEFAULT_MAX_ATTEMPTS;
pub use registry::RegistryConfig;
pub use registry::SlotRegistry;
pub use system::ProcfsLiveness;
pub use system::SystemClock;
pub use system::SystemIdentity;
