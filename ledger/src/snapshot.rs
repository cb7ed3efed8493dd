//! Ledger snapshots — capture every account at a point in time.
//!
//! A snapshot stores accounts exactly as they sit in the ledger (principal
//! not settled, `last_settled` preserved), so a restored ledger computes the
//! same balances as the original at any later instant. The snapshot hash is
//! computed deterministically from the sorted contents so a peer can verify
//! integrity before restoring.

use serde::{Deserialize, Serialize};
use tidal_types::{Address, Timestamp};

use crate::account::Account;
use crate::error::LedgerError;
use crate::ledger::{Ledger, SupplyTotals};
use crate::policy::AccessPolicy;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A ledger snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the snapshot contents (everything below).
    pub hash: [u8; 32],
    pub version: u32,
    /// When the snapshot was taken.
    pub created_at: Timestamp,
    /// Accounts, sorted by address.
    pub accounts: Vec<AccountSnapshot>,
    /// Allowances, sorted by (owner, spender).
    pub allowances: Vec<AllowanceSnapshot>,
    pub totals: SupplyTotals,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub address: Address,
    pub account: Account,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSnapshot {
    pub owner: Address,
    pub spender: Address,
    pub amount: u128,
}

impl LedgerSnapshot {
    /// Compute the Blake2b-256 hash of this snapshot's contents.
    pub fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.created_at.as_secs().to_le_bytes());
        for entry in &self.accounts {
            hasher.update(entry.address.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(entry.account.principal.to_le_bytes());
            hasher.update(entry.account.rate.to_le_bytes());
            hasher.update(entry.account.last_settled.as_secs().to_le_bytes());
        }
        for entry in &self.allowances {
            hasher.update(entry.owner.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(entry.spender.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(entry.amount.to_le_bytes());
        }
        hasher.update(self.totals.granted.to_le_bytes());
        hasher.update(self.totals.withdrawn.to_le_bytes());
        hasher.update(self.totals.interest_settled.to_le_bytes());

        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }

    /// Whether the stored hash matches the contents.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
    }
}

impl Ledger {
    /// Capture the ledger's stored state.
    pub fn snapshot(&self, now: Timestamp) -> LedgerSnapshot {
        let mut accounts: Vec<AccountSnapshot> = self
            .accounts
            .iter()
            .map(|(address, account)| AccountSnapshot {
                address: address.clone(),
                account: account.clone(),
            })
            .collect();
        accounts.sort_by(|a, b| a.address.cmp(&b.address));

        let mut allowances: Vec<AllowanceSnapshot> = self
            .allowances
            .iter()
            .flat_map(|(owner, spenders)| {
                spenders.iter().map(move |(spender, amount)| AllowanceSnapshot {
                    owner: owner.clone(),
                    spender: spender.clone(),
                    amount: *amount,
                })
            })
            .collect();
        allowances.sort_by(|a, b| (&a.owner, &a.spender).cmp(&(&b.owner, &b.spender)));

        let mut snap = LedgerSnapshot {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            created_at: now,
            accounts,
            allowances,
            totals: self.totals,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Rebuild a ledger from a verified snapshot under `policy`.
    ///
    /// The policy is not part of the snapshot: authorization is always
    /// supplied by whoever constructs the ledger.
    pub fn restore(policy: AccessPolicy, snapshot: &LedgerSnapshot) -> Result<Self, LedgerError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LedgerError::SnapshotVersion(snapshot.version));
        }
        let computed = snapshot.compute_hash();
        if computed != snapshot.hash {
            return Err(LedgerError::SnapshotCorrupt {
                expected: hex::encode(snapshot.hash),
                computed: hex::encode(computed),
            });
        }

        let mut ledger = Ledger::new(policy);
        let mut total_principal: u128 = 0;
        for entry in &snapshot.accounts {
            total_principal = total_principal
                .checked_add(entry.account.principal)
                .ok_or(LedgerError::Overflow)?;
            ledger
                .accounts
                .insert(entry.address.clone(), entry.account.clone());
        }
        for entry in &snapshot.allowances {
            ledger
                .allowances
                .entry(entry.owner.clone())
                .or_default()
                .insert(entry.spender.clone(), entry.amount);
        }
        ledger.totals = snapshot.totals;
        ledger.total_principal = total_principal;
        if !ledger.check_supply() {
            tracing::warn!(
                principal = total_principal,
                hash = %snapshot.hash_hex(),
                "snapshot supply totals do not balance"
            );
            return Err(LedgerError::SupplyMismatch {
                principal: total_principal,
                granted: snapshot.totals.granted,
                withdrawn: snapshot.totals.withdrawn,
                interest_settled: snapshot.totals.interest_settled,
            });
        }
        tracing::info!(
            accounts = snapshot.accounts.len(),
            hash = %snapshot.hash_hex(),
            "ledger restored from snapshot"
        );
        Ok(ledger)
    }
}
