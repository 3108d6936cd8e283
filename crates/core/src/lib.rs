//! `forgebank-core`: account-management building blocks.
//!
//! This crate contains **pure** primitives shared by the domain and
//! infrastructure layers (no IO).

pub mod clock;
pub mod error;
pub mod iban;
pub mod value_object;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AccountError, AccountResult, ErrorKind};
pub use iban::Iban;
pub use value_object::ValueObject;
