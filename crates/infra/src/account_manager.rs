//! Account operations pipeline (application-level orchestration).
//!
//! The `AccountManager` composes the field validators, the record models and
//! a [`LedgerStore`] into the public account operations:
//!
//! ```text
//! raw input
//!   ↓
//! 1. Validate every field, in a fixed order (first failure wins)
//!   ↓
//! 2. Build the immutable record (capture time from the injected clock)
//!   ↓
//! 3. Append to the store (duplicate check for transfers)
//!   ↓
//! 4. Return the record's code / signature / balance
//! ```
//!
//! Validation failures never reach the store, and store failures leave the
//! store unchanged, so every operation is all-or-nothing.

use std::path::Path;

use rust_decimal::Decimal;
use tracing::{info, warn};

use forgebank_accounts::{
    BalanceSnapshot, Concept, Deposit, DepositAmount, DepositRecord, TransferAmount, TransferDate,
    TransferRecord, TransferRequest, TransferType, balance_of,
};
use forgebank_core::{AccountError, AccountResult, Clock, Iban, SystemClock};

use crate::deposit_intent::DepositIntent;
use crate::ledger_store::LedgerStore;

/// Entry point for transfers, deposits and balance queries.
///
/// Generic over the store (`S`) and the time source (`C`) so tests can run
/// against [`crate::ledger_store::InMemoryLedgerStore`] and a
/// [`forgebank_core::FixedClock`].
#[derive(Debug)]
pub struct AccountManager<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S> AccountManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S, C> AccountManager<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (S, C) {
        (self.store, self.clock)
    }
}

impl<S, C> AccountManager<S, C>
where
    S: LedgerStore,
    C: Clock,
{
    /// Validate and record a transfer request, returning its transfer code.
    ///
    /// Fields are validated in order: source IBAN, destination IBAN, concept,
    /// type, date, amount. A request whose logical fields match a stored one
    /// fails with `DuplicateTransfer`.
    #[tracing::instrument(skip(self, concept))]
    pub fn submit_transfer(
        &self,
        from_iban: &str,
        to_iban: &str,
        concept: &str,
        transfer_type: &str,
        date: &str,
        amount: &str,
    ) -> AccountResult<String> {
        self.try_submit_transfer(from_iban, to_iban, concept, transfer_type, date, amount)
            .inspect_err(|e| warn!(kind = %e.kind(), error = %e, "transfer rejected"))
    }

    fn try_submit_transfer(
        &self,
        from_iban: &str,
        to_iban: &str,
        concept: &str,
        transfer_type: &str,
        date: &str,
        amount: &str,
    ) -> AccountResult<String> {
        let from_iban = Iban::parse(from_iban)?;
        let to_iban = Iban::parse(to_iban)?;
        let concept = Concept::parse(concept)?;
        let transfer_type: TransferType = transfer_type.parse()?;
        let transfer_date = TransferDate::parse(date, self.clock.today())?;
        let transfer_amount = TransferAmount::parse(amount)?;

        let request = TransferRequest::new(
            from_iban,
            to_iban,
            transfer_type,
            concept,
            transfer_date,
            transfer_amount,
            self.clock.now(),
        );
        let record = request.to_record();
        let code = record.transfer_code.clone();

        self.store.append_transfer(record)?;

        info!(
            transfer_code = %code,
            from_iban = %request.from_iban(),
            to_iban = %request.to_iban(),
            amount = %request.transfer_amount(),
            "transfer recorded"
        );
        Ok(code)
    }

    /// Record the deposit described by the intent file at `source`, returning
    /// its signature.
    #[tracing::instrument(skip(self, source), fields(source = %source.as_ref().display()))]
    pub fn record_deposit(&self, source: impl AsRef<Path>) -> AccountResult<String> {
        self.try_record_deposit(source.as_ref())
            .inspect_err(|e| warn!(kind = %e.kind(), error = %e, "deposit rejected"))
    }

    fn try_record_deposit(&self, source: &Path) -> AccountResult<String> {
        let intent = DepositIntent::load(source)?;

        let to_iban = Iban::parse(&intent.iban)?;
        let amount = DepositAmount::parse(&intent.amount)?;

        let deposit = Deposit::new(to_iban, amount, self.clock.now());
        let record = deposit.to_record();
        let signature = record.deposit_signature.clone();

        self.store.append_deposit(record)?;

        info!(
            deposit_signature = %signature,
            to_iban = %deposit.to_iban(),
            amount = %deposit.deposit_amount(),
            "deposit recorded"
        );
        Ok(signature)
    }

    /// Sum the transaction log for `iban` and append a balance snapshot.
    ///
    /// Fails with `IbanNotFound` (and writes nothing) when the log has no
    /// entry for the account, and with `CorruptStore` when the sum does not
    /// fit a `Decimal`.
    #[tracing::instrument(skip(self))]
    pub fn get_balance(&self, iban: &str) -> AccountResult<Decimal> {
        self.try_get_balance(iban)
            .inspect_err(|e| warn!(kind = %e.kind(), error = %e, "balance rejected"))
    }

    fn try_get_balance(&self, iban: &str) -> AccountResult<Decimal> {
        let iban = Iban::parse(iban)?;
        let transactions = self.store.transactions()?;

        let balance = balance_of(&iban, &transactions)?.ok_or_else(AccountError::iban_not_found)?;

        self.store
            .append_balance(BalanceSnapshot::new(iban.clone(), balance, self.clock.now()))?;

        info!(iban = %iban, balance = %balance, "balance computed");
        Ok(balance)
    }

    /// Look up a stored transfer by its code.
    pub fn find_transfer(&self, transfer_code: &str) -> AccountResult<Option<TransferRecord>> {
        Ok(self
            .store
            .transfers()?
            .into_iter()
            .find(|t| t.transfer_code == transfer_code))
    }

    /// Look up a stored deposit by its signature.
    pub fn find_deposit(&self, deposit_signature: &str) -> AccountResult<Option<DepositRecord>> {
        Ok(self
            .store
            .deposits()?
            .into_iter()
            .find(|d| d.deposit_signature == deposit_signature))
    }

    /// Every snapshot computed for `iban`, oldest first.
    pub fn balance_history(&self, iban: &str) -> AccountResult<Vec<BalanceSnapshot>> {
        let iban = Iban::parse(iban)?;
        Ok(self
            .store
            .balances()?
            .into_iter()
            .filter(|b| b.iban == iban)
            .collect())
    }
}
