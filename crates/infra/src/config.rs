//! Store file locations.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "./data";

pub const TRANSFERS_FILE: &str = "transfers_store.json";
pub const DEPOSITS_FILE: &str = "deposits_store.json";
pub const TRANSACTIONS_FILE: &str = "transactions.json";
pub const BALANCES_FILE: &str = "balances.json";

/// Paths of the JSON files backing the ledger.
///
/// Injected into the store; nothing reads paths from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub transfers: PathBuf,
    pub deposits: PathBuf,
    /// Collaborator-produced transaction log (read-only).
    pub transactions: PathBuf,
    pub balances: PathBuf,
}

impl StoreConfig {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            transfers: dir.join(TRANSFERS_FILE),
            deposits: dir.join(DEPOSITS_FILE),
            transactions: dir.join(TRANSACTIONS_FILE),
            balances: dir.join(BALANCES_FILE),
        }
    }

    /// Load from the environment.
    ///
    /// - `FORGEBANK_DATA_DIR` (default `./data`)
    /// - `FORGEBANK_TRANSFERS_FILE`, `FORGEBANK_DEPOSITS_FILE`,
    ///   `FORGEBANK_TRANSACTIONS_FILE`, `FORGEBANK_BALANCES_FILE` override
    ///   individual files
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let dir = lookup("FORGEBANK_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let mut config = Self::in_dir(dir);

        if let Some(path) = lookup("FORGEBANK_TRANSFERS_FILE") {
            config.transfers = path.into();
        }
        if let Some(path) = lookup("FORGEBANK_DEPOSITS_FILE") {
            config.deposits = path.into();
        }
        if let Some(path) = lookup("FORGEBANK_TRANSACTIONS_FILE") {
            config.transactions = path.into();
        }
        if let Some(path) = lookup("FORGEBANK_BALANCES_FILE") {
            config.balances = path.into();
        }

        config
    }

    pub fn with_transactions(mut self, path: impl Into<PathBuf>) -> Self {
        self.transactions = path.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}
