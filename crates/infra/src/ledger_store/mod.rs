//! Append-only ledger store boundary.
//!
//! Defines the persistence abstraction used by the account manager and its
//! two implementations: JSON files (production) and memory (tests/dev).

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use json_file::JsonFileStore;
pub use r#trait::{LedgerStore, StoreError};
