use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use forgebank_accounts::{BalanceSnapshot, DepositRecord, Transaction, TransferRecord};

use super::r#trait::{LedgerStore, StoreError, ensure_not_duplicate};
use crate::config::StoreConfig;

/// What a read does when the file does not exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum IfMissing {
    Empty,
    Fail,
}

/// JSON-file ledger store.
///
/// Each collection is one JSON array file written with 2-space indentation.
/// Appends load the array, push the record and replace the file through a
/// sibling `.tmp` file and a rename. A per-collection mutex serializes the
/// cycle within the process; other processes are not coordinated.
#[derive(Debug)]
pub struct JsonFileStore {
    config: StoreConfig,
    transfers_lock: Mutex<()>,
    deposits_lock: Mutex<()>,
    balances_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            transfers_lock: Mutex::new(()),
            deposits_lock: Mutex::new(()),
            balances_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn read_array<T: DeserializeOwned>(path: &Path, if_missing: IfMissing) -> Result<Vec<T>, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == IoErrorKind::NotFound && if_missing == IfMissing::Empty => {
                tracing::debug!(path = %path.display(), "store file absent; reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::Unavailable(format!("{}: {e}", path.display())));
            }
        };

        let records: Vec<T> = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), records = records.len(), "store file read");
        Ok(records)
    }

    fn write_array<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
        let unavailable = |e: &dyn core::fmt::Display| {
            StoreError::Unavailable(format!("{}: {e}", path.display()))
        };

        // Serialize fully before touching the file.
        let bytes = serde_json::to_vec_pretty(records).map_err(|e| unavailable(&e))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unavailable(&e))?;
        }

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(|e| unavailable(&e))?;
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            unavailable(&e)
        })
    }

    /// Read-modify-write cycle for one collection, under `lock`.
    fn append_with<T, F>(lock: &Mutex<()>, path: &Path, record: T, check: F) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&[T], &T) -> Result<(), StoreError>,
    {
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Unavailable(format!("{}: lock poisoned", path.display())))?;

        let mut records: Vec<T> = Self::read_array(path, IfMissing::Empty)?;
        check(&records, &record)?;
        records.push(record);
        Self::write_array(path, &records)
    }
}

impl LedgerStore for JsonFileStore {
    fn transfers(&self) -> Result<Vec<TransferRecord>, StoreError> {
        Self::read_array(&self.config.transfers, IfMissing::Empty)
    }

    fn append_transfer(&self, record: TransferRecord) -> Result<(), StoreError> {
        Self::append_with(&self.transfers_lock, &self.config.transfers, record, ensure_not_duplicate)
    }

    fn deposits(&self) -> Result<Vec<DepositRecord>, StoreError> {
        Self::read_array(&self.config.deposits, IfMissing::Empty)
    }

    fn append_deposit(&self, record: DepositRecord) -> Result<(), StoreError> {
        Self::append_with(&self.deposits_lock, &self.config.deposits, record, |_, _| Ok(()))
    }

    fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Self::read_array(&self.config.transactions, IfMissing::Fail)
    }

    fn balances(&self) -> Result<Vec<BalanceSnapshot>, StoreError> {
        Self::read_array(&self.config.balances, IfMissing::Empty)
    }

    fn append_balance(&self, snapshot: BalanceSnapshot) -> Result<(), StoreError> {
        Self::append_with(&self.balances_lock, &self.config.balances, snapshot, |_, _| Ok(()))
    }
}
