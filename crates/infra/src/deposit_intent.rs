//! Deposit intent files handed over by the collaborator.
//!
//! Shape: `{"IBAN": "<iban>", "AMOUNT": "EUR dddd.dd"}`.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use serde_json::Value as JsonValue;

use forgebank_core::{AccountError, AccountResult};

const IBAN_KEY: &str = "IBAN";
const AMOUNT_KEY: &str = "AMOUNT";

/// Raw, not yet validated fields of a deposit intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositIntent {
    pub iban: String,
    pub amount: String,
}

impl DepositIntent {
    /// Read and decode an intent file.
    ///
    /// Both keys must be present (`MissingField`). A non-string `IBAN` is an
    /// `InvalidFormat`, a non-string `AMOUNT` an `InvalidDepositAmount`.
    pub fn load(path: &Path) -> AccountResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound => AccountError::store_unavailable(format!(
                "Error: file input not found: {}",
                path.display()
            )),
            _ => AccountError::store_unavailable(format!("{}: {e}", path.display())),
        })?;

        let document: JsonValue = serde_json::from_str(&contents)
            .map_err(|e| AccountError::corrupt_store(format!("JSON Decode Error - Wrong JSON Format: {e}")))?;

        Self::from_json(&document)
    }

    pub fn from_json(document: &JsonValue) -> AccountResult<Self> {
        let (Some(iban), Some(amount)) = (document.get(IBAN_KEY), document.get(AMOUNT_KEY)) else {
            return Err(AccountError::missing_field("Error - Invalid Key in JSON"));
        };

        let iban = iban.as_str().ok_or_else(AccountError::invalid_format)?;
        let amount = amount
            .as_str()
            .ok_or_else(|| AccountError::invalid_deposit_amount("Error - Invalid deposit amount"))?;

        Ok(Self {
            iban: iban.to_string(),
            amount: amount.to_string(),
        })
    }
}
