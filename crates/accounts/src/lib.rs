//! Account management domain (transfers, deposits, balances).
//!
//! Pure domain logic only: no IO, no persistence concerns. Field grammars
//! live in [`validation`]; records compute their own signatures.

pub mod balance;
pub mod deposit;
mod timestamp;
pub mod transfer;
pub mod validation;

pub use balance::{BalanceSnapshot, Transaction, balance_of};
pub use deposit::{Deposit, DepositRecord};
pub use transfer::{TransferRecord, TransferRequest, TransferType};
pub use validation::{Concept, DepositAmount, TransferAmount, TransferDate};
