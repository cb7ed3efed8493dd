//! Domain snapshots: the ledger together with the bridge's duplicate window.
//!
//! The window is saved with the ledger it describes. Restoring one without
//! the other either re-credits a delivery the ledger already holds or
//! refuses a credit the restored ledger never received.

use serde::{Deserialize, Serialize};
use tidal_ledger::LedgerSnapshot;
use tidal_types::{DeliveryId, DomainId};

use crate::error::NodeError;

/// Current domain snapshot format version.
pub const DOMAIN_SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSnapshot {
    /// Blake2b-256 over the version, domain, ledger hash and deliveries.
    pub hash: [u8; 32],
    pub version: u32,
    pub domain_id: DomainId,
    pub ledger: LedgerSnapshot,
    /// Credited delivery ids still inside the duplicate window, oldest first.
    pub deliveries: Vec<DeliveryId>,
}

impl DomainSnapshot {
    pub fn new(domain_id: DomainId, ledger: LedgerSnapshot, deliveries: Vec<DeliveryId>) -> Self {
        let mut snapshot = Self {
            hash: [0u8; 32],
            version: DOMAIN_SNAPSHOT_VERSION,
            domain_id,
            ledger,
            deliveries,
        };
        snapshot.hash = snapshot.compute_hash();
        snapshot
    }

    pub fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.domain_id.as_u32().to_le_bytes());
        hasher.update(self.ledger.hash);
        hasher.update((self.deliveries.len() as u64).to_le_bytes());
        for id in &self.deliveries {
            hasher.update(id.as_bytes());
        }

        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }

    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Check version and hash. The embedded ledger snapshot is checked
    /// separately when it is restored.
    pub fn check(&self) -> Result<(), NodeError> {
        if self.version != DOMAIN_SNAPSHOT_VERSION {
            return Err(NodeError::Snapshot(format!(
                "unsupported domain snapshot version {}",
                self.version
            )));
        }
        if !self.verify() {
            return Err(NodeError::Snapshot(format!(
                "domain snapshot hash mismatch: expected {}, computed {}",
                self.hash_hex(),
                hex::encode(self.compute_hash())
            )));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, NodeError> {
        bincode::serialize(self).map_err(|e| NodeError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NodeError> {
        bincode::deserialize(bytes).map_err(|e| NodeError::Snapshot(e.to_string()))
    }
}
