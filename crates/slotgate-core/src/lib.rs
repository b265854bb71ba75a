//! Core traits and document types for the slotgate registry.
//!
//! This crate defines the interfaces the registry engine is written against:
//!
//! - [`RegistryStore`] - the document store capability (fetch-or-create,
//!   conditional whole-document replace, atomic field set/unset)
//! - [`LivenessProbe`] - "is this local pid still running"
//! - [`ProcessIdentity`] / [`Clock`] - injectable host identity and time
//!
//! Implementations live elsewhere: the engine and its platform defaults in
//! `slotgate`, deterministic in-memory doubles in `slotgate-testing`. Any
//! document store offering conditional-replace and nested field-path update
//! semantics can back [`RegistryStore`].

mod encoding;
mod error;
mod providers;
mod store;
mod types;

pub use encoding::encode_hostname;
pub use error::StoreError;
pub use providers::Clock;
pub use providers::LivenessProbe;
pub use providers::ProcessIdentity;
pub use store::RegistryStore;
pub use types::HostMap;
pub use types::MAX_EXPIRY_SECS;
pub use types::RegistrySnapshot;
