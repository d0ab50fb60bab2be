//! Resource layer: the normalized snapshot model and its JSON decoding.
//!
//! This module owns:
//! - ResourceState / HealthStatus (one model for every platform)
//! - Platform (health wire codes, default root rule)
//! - Snapshot decoding (raw JSON -> ResourceState list)

pub mod platform;
pub mod snapshot;
pub mod state;

pub use platform::Platform;
pub use snapshot::{CollectionKey, Snapshot, SnapshotVersion};
pub use state::{HealthStatus, ResourceState};
