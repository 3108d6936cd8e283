use std::sync::Arc;

use thiserror::Error;

use forgebank_accounts::{BalanceSnapshot, DepositRecord, Transaction, TransferRecord};
use forgebank_core::AccountError;

/// Ledger store operation error.
///
/// These are **infrastructure errors** (files, JSON) plus the one business
/// rule the store enforces itself: transfer deduplication.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A file could not be read or written.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A file holds malformed JSON (or records of the wrong shape).
    #[error("corrupt store: {0}")]
    Corrupt(String),

    /// A transfer with the same logical fields is already stored.
    #[error("duplicated transfer (existing code {existing_code})")]
    DuplicateTransfer { existing_code: String },
}

impl From<StoreError> for AccountError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => {
                AccountError::store_unavailable(format!("Wrong file or file path: {msg}"))
            }
            StoreError::Corrupt(msg) => {
                AccountError::corrupt_store(format!("JSON Decode Error - Wrong JSON Format: {msg}"))
            }
            StoreError::DuplicateTransfer { .. } => AccountError::duplicate_transfer(),
        }
    }
}

/// Append-only ledger of transfers, deposits and balance snapshots, plus
/// read access to the collaborator-produced transaction log.
///
/// ## Read semantics
///
/// - An absent transfers, deposits or balances collection reads as empty.
/// - An absent transaction log is `StoreError::Unavailable`: it is an
///   external precondition, not something this store appends to.
/// - Malformed content is `StoreError::Corrupt`.
///
/// ## Append semantics
///
/// Appends replace the whole collection in one operation: either the new
/// record is visible together with every previous one, or nothing changed.
/// Implementations serialize the read-modify-write cycle of each collection.
pub trait LedgerStore: Send + Sync {
    fn transfers(&self) -> Result<Vec<TransferRecord>, StoreError>;

    /// Append a transfer unless one with the same logical fields exists
    /// (`StoreError::DuplicateTransfer`, nothing written).
    fn append_transfer(&self, record: TransferRecord) -> Result<(), StoreError>;

    fn deposits(&self) -> Result<Vec<DepositRecord>, StoreError>;

    fn append_deposit(&self, record: DepositRecord) -> Result<(), StoreError>;

    /// Read the transaction log.
    fn transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    fn balances(&self) -> Result<Vec<BalanceSnapshot>, StoreError>;

    fn append_balance(&self, snapshot: BalanceSnapshot) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn transfers(&self) -> Result<Vec<TransferRecord>, StoreError> {
        (**self).transfers()
    }

    fn append_transfer(&self, record: TransferRecord) -> Result<(), StoreError> {
        (**self).append_transfer(record)
    }

    fn deposits(&self) -> Result<Vec<DepositRecord>, StoreError> {
        (**self).deposits()
    }

    fn append_deposit(&self, record: DepositRecord) -> Result<(), StoreError> {
        (**self).append_deposit(record)
    }

    fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        (**self).transactions()
    }

    fn balances(&self) -> Result<Vec<BalanceSnapshot>, StoreError> {
        (**self).balances()
    }

    fn append_balance(&self, snapshot: BalanceSnapshot) -> Result<(), StoreError> {
        (**self).append_balance(snapshot)
    }
}

/// Reject `record` if `existing` already holds the same logical transfer.
pub(crate) fn ensure_not_duplicate(
    existing: &[TransferRecord],
    record: &TransferRecord,
) -> Result<(), StoreError> {
    match existing.iter().find(|t| t.same_transfer(record)) {
        Some(found) => Err(StoreError::DuplicateTransfer {
            existing_code: found.transfer_code.clone(),
        }),
        None => Ok(()),
    }
}
