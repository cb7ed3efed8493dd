//! Domain configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tidal_bridge::{AdapterConfig, RouteEntry};
use tidal_types::{Address, DomainId, DEFAULT_RATE};

use crate::NodeError;

/// Configuration for one domain.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Which domain this instance serves.
    #[serde(default = "default_domain_id")]
    pub domain_id: DomainId,

    /// Rate owner, and administrator of the custodian set.
    #[serde(default = "default_owner")]
    pub owner: Address,

    /// Custody front ends allowed to grant and withdraw.
    #[serde(default)]
    pub custodians: Vec<Address>,

    /// The bridge adapter's own identity on the ledger.
    #[serde(default = "default_adapter_identity")]
    pub adapter_identity: Address,

    /// Transport routers allowed to drive the adapter.
    #[serde(default)]
    pub routers: Vec<Address>,

    /// Rate the registry starts at, scaled by `PRECISION`.
    ///
    /// Kept as `u64` because TOML integers are 64-bit.
    #[serde(default = "default_initial_rate")]
    pub initial_rate: u64,

    /// Restrict outbound bridging to these senders. Absent means anyone.
    #[serde(default)]
    pub sender_allowlist: Option<Vec<Address>>,

    /// Where `checkpoint` writes and `recover` reads domain snapshots.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inbound rate policy and duplicate guard.
    #[serde(default)]
    pub adapter: AdapterConfig,

    /// Paired adapters on remote domains.
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_domain_id() -> DomainId {
    DomainId::new(1)
}

fn default_owner() -> Address {
    Address::new("tdl_owner")
}

fn default_adapter_identity() -> Address {
    Address::new("tdl_adapter")
}

fn default_initial_rate() -> u64 {
    DEFAULT_RATE as u64
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            domain_id: default_domain_id(),
            owner: default_owner(),
            custodians: Vec::new(),
            adapter_identity: default_adapter_identity(),
            routers: Vec::new(),
            initial_rate: default_initial_rate(),
            sender_allowlist: None,
            snapshot_path: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            adapter: AdapterConfig::default(),
            routes: Vec::new(),
        }
    }
}
