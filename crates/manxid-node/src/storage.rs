//! RocksDB storage backend for the Manx ID node.

use anyhow::Result;
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use std::sync::Mutex;

use manxid_core::ValidationCode;
use manxid_credentials::{CredentialStore, IssuanceRecord, StoreError};

/// Column family for issuance records keyed by validation code.
const CF_CREDENTIALS: &str = "credentials";

/// RocksDB-backed credential store.
///
/// Reads are lock-free; inserts and revocations take a private mutex so
/// the collision check on the validation code stays atomic across
/// concurrent issuances.
pub struct RocksStore {
    db: DB,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![ColumnFamilyDescriptor::new(
            CF_CREDENTIALS,
            Options::default(),
        )];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(CF_CREDENTIALS)
            .ok_or_else(|| StoreError::Backend(format!("column family '{}' not found", CF_CREDENTIALS)))
    }

    fn read(&self, code: &ValidationCode) -> Result<Option<IssuanceRecord>, StoreError> {
        let cf = self.cf()?;
        let bytes = self
            .db
            .get_cf(cf, code.as_str().as_bytes())
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match bytes {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Backend(format!("corrupt record: {}", e)))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn write(&self, record: &IssuanceRecord) -> Result<(), StoreError> {
        let cf = self.cf()?;
        let key = record.credential.validation_code.as_str().as_bytes();
        let bytes =
            serde_json::to_vec(record).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.db
            .put_cf(cf, key, bytes)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl CredentialStore for RocksStore {
    fn insert(&self, record: IssuanceRecord) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("write lock poisoned".into()))?;

        if self.read(&record.credential.validation_code)?.is_some() {
            return Err(StoreError::CodeCollision);
        }
        self.write(&record)
    }

    fn get(&self, code: &ValidationCode) -> Result<Option<IssuanceRecord>, StoreError> {
        self.read(code)
    }

    fn revoke(&self, code: &ValidationCode) -> Result<bool, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("write lock poisoned".into()))?;

        match self.read(code)? {
            Some(mut record) => {
                record.revoked = true;
                self.write(&record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
