use std::sync::RwLock;

use forgebank_accounts::{BalanceSnapshot, DepositRecord, Transaction, TransferRecord};

use super::r#trait::{LedgerStore, StoreError, ensure_not_duplicate};

/// In-memory ledger store.
///
/// Intended for tests/dev. The transaction log is absent until seeded with
/// [`InMemoryLedgerStore::with_transactions`].
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    transfers: RwLock<Vec<TransferRecord>>,
    deposits: RwLock<Vec<DepositRecord>>,
    transactions: Option<Vec<Transaction>>,
    balances: RwLock<Vec<BalanceSnapshot>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = Some(transactions);
        self
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl LedgerStore for InMemoryLedgerStore {
    fn transfers(&self) -> Result<Vec<TransferRecord>, StoreError> {
        Ok(self.transfers.read().map_err(|_| poisoned())?.clone())
    }

    fn append_transfer(&self, record: TransferRecord) -> Result<(), StoreError> {
        let mut transfers = self.transfers.write().map_err(|_| poisoned())?;
        ensure_not_duplicate(&transfers, &record)?;
        transfers.push(record);
        Ok(())
    }

    fn deposits(&self) -> Result<Vec<DepositRecord>, StoreError> {
        Ok(self.deposits.read().map_err(|_| poisoned())?.clone())
    }

    fn append_deposit(&self, record: DepositRecord) -> Result<(), StoreError> {
        self.deposits.write().map_err(|_| poisoned())?.push(record);
        Ok(())
    }

    fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        self.transactions
            .clone()
            .ok_or_else(|| StoreError::Unavailable("transaction log not loaded".to_string()))
    }

    fn balances(&self) -> Result<Vec<BalanceSnapshot>, StoreError> {
        Ok(self.balances.read().map_err(|_| poisoned())?.clone())
    }

    fn append_balance(&self, snapshot: BalanceSnapshot) -> Result<(), StoreError> {
        self.balances.write().map_err(|_| poisoned())?.push(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn transaction_log_is_unavailable_until_seeded() {
        let store = InMemoryLedgerStore::new();
        assert!(matches!(store.transactions(), Err(StoreError::Unavailable(_))));

        let seeded = InMemoryLedgerStore::new().with_transactions(vec![Transaction {
            iban: "ES3559005439021242088295".to_string(),
            amount: dec!(12.5),
        }]);
        assert_eq!(seeded.transactions().unwrap().len(), 1);
    }
}
