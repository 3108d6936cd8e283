//! Infrastructure layer: ledger persistence, configuration and the account
//! operations pipeline.

pub mod account_manager;
pub mod config;
pub mod deposit_intent;
pub mod ledger_store;

#[cfg(test)]
mod integration_tests;

pub use account_manager::AccountManager;
pub use config::StoreConfig;
pub use deposit_intent::DepositIntent;
pub use ledger_store::{InMemoryLedgerStore, JsonFileStore, LedgerStore, StoreError};
