//! One tidal domain, assembled from its parts.
//!
//! A domain instance owns:
//! - The rate registry (the single, decrease-only current rate)
//! - The interest-accruing ledger
//! - The bridge adapter and its routing table
//! - A clock, and an event bus for observers
//!
//! Two domains talk only through bridge messages carried by an external
//! transport.

pub mod config;
pub mod domain;
pub mod error;
pub mod event;
pub mod logging;
pub mod snapshot;
pub mod spans;

pub use config::NodeConfig;
pub use domain::DomainNode;
pub use error::NodeError;
pub use event::{EventBus, NodeEvent};
pub use logging::{init_from_config, init_logging, LogFormat};
pub use snapshot::{DomainSnapshot, DOMAIN_SNAPSHOT_VERSION};
