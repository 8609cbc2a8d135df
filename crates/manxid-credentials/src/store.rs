use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use manxid_core::{Credential, ValidationCode};

/// Credential store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation code already present")]
    CodeCollision,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// What the issuer writes for every issuance, keyed by validation code.
///
/// `age` is part of the signed payload but not a credential field, so it
/// is retained here for the verifier to recompute the signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuanceRecord {
    /// The issued credential as returned to the holder.
    pub credential: Credential,
    /// Age supplied at issuance.
    pub age: i64,
    /// Whether the credential has been revoked since issuance.
    pub revoked: bool,
}

impl IssuanceRecord {
    /// Build the record for a freshly issued credential.
    pub fn new(credential: Credential, age: i64) -> Self {
        Self {
            credential,
            age,
            revoked: false,
        }
    }
}

/// Durable, concurrently readable store of issuance records keyed by
/// validation code.
///
/// `insert` must be atomic with respect to the collision check so two
/// concurrent issuances can never both claim the same code.
pub trait CredentialStore: Send + Sync {
    /// Insert a record for a code not yet present.
    fn insert(&self, record: IssuanceRecord) -> Result<(), StoreError>;

    /// Look up a record by validation code.
    fn get(&self, code: &ValidationCode) -> Result<Option<IssuanceRecord>, StoreError>;

    /// Mark a record revoked. Returns whether the code was known.
    fn revoke(&self, code: &ValidationCode) -> Result<bool, StoreError>;
}

/// In-memory credential store.
///
/// Used by tests and by deployments that accept losing credentials on
/// restart; the node ships a RocksDB-backed implementation for
/// everything else.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, IssuanceRecord>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn insert(&self, record: IssuanceRecord) -> Result<(), StoreError> {
        let key = record.credential.validation_code.as_str().to_string();
        match self.records.entry(key) {
            Entry::Occupied(_) => Err(StoreError::CodeCollision),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    fn get(&self, code: &ValidationCode) -> Result<Option<IssuanceRecord>, StoreError> {
        Ok(self.records.get(code.as_str()).map(|e| e.clone()))
    }

    fn revoke(&self, code: &ValidationCode) -> Result<bool, StoreError> {
        match self.records.get_mut(code.as_str()) {
            Some(mut record) => {
                record.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
