use core::str::FromStr;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use forgebank_core::{AccountError, Iban, ValueObject};

use crate::validation::{Concept, TransferAmount, TransferDate};

/// How fast a transfer is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferType {
    Ordinary,
    Inmediate,
    Urgent,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Ordinary => "ORDINARY",
            TransferType::Inmediate => "INMEDIATE",
            TransferType::Urgent => "URGENT",
        }
    }
}

impl core::fmt::Display for TransferType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = AccountError;

    /// Exact, case-sensitive match on the upper-case name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDINARY" => Ok(TransferType::Ordinary),
            "INMEDIATE" => Ok(TransferType::Inmediate),
            "URGENT" => Ok(TransferType::Urgent),
            _ => Err(AccountError::invalid_transfer_type()),
        }
    }
}

/// A validated transfer request (immutable).
///
/// `created_at` is captured once at construction and takes part in the
/// transfer code, so two requests with the same fields submitted at different
/// instants have different codes. Duplicate detection therefore compares the
/// logical fields, not the code (see [`TransferRecord::same_transfer`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    from_iban: Iban,
    to_iban: Iban,
    transfer_type: TransferType,
    concept: Concept,
    transfer_date: TransferDate,
    transfer_amount: TransferAmount,
    created_at: DateTime<Utc>,
}

impl ValueObject for TransferRequest {}

impl TransferRequest {
    pub fn new(
        from_iban: Iban,
        to_iban: Iban,
        transfer_type: TransferType,
        concept: Concept,
        transfer_date: TransferDate,
        transfer_amount: TransferAmount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            from_iban,
            to_iban,
            transfer_type,
            concept,
            transfer_date,
            transfer_amount,
            created_at,
        }
    }

    pub fn from_iban(&self) -> &Iban {
        &self.from_iban
    }

    pub fn to_iban(&self) -> &Iban {
        &self.to_iban
    }

    pub fn transfer_type(&self) -> TransferType {
        self.transfer_type
    }

    pub fn concept(&self) -> &Concept {
        &self.concept
    }

    pub fn transfer_date(&self) -> TransferDate {
        self.transfer_date
    }

    pub fn transfer_amount(&self) -> TransferAmount {
        self.transfer_amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// MD5 hex digest of the canonical field string.
    pub fn transfer_code(&self) -> String {
        transfer_code(
            &self.from_iban,
            &self.to_iban,
            self.transfer_type,
            &self.concept,
            self.transfer_date,
            self.transfer_amount,
            self.created_at,
        )
    }

    /// Store representation, including the derived code.
    pub fn to_record(&self) -> TransferRecord {
        TransferRecord {
            from_iban: self.from_iban.clone(),
            to_iban: self.to_iban.clone(),
            transfer_type: self.transfer_type,
            transfer_amount: self.transfer_amount,
            transfer_concept: self.concept.clone(),
            transfer_date: self.transfer_date,
            time_stamp: self.created_at,
            transfer_code: self.transfer_code(),
        }
    }
}

/// Transfer as persisted in the transfers store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from_iban: Iban,
    pub to_iban: Iban,
    pub transfer_type: TransferType,
    pub transfer_amount: TransferAmount,
    pub transfer_concept: Concept,
    pub transfer_date: TransferDate,
    #[serde(deserialize_with = "crate::timestamp::lenient")]
    pub time_stamp: DateTime<Utc>,
    pub transfer_code: String,
}

impl ValueObject for TransferRecord {}

impl TransferRecord {
    /// True when both records describe the same logical transfer
    /// (ignores `time_stamp` and `transfer_code`).
    pub fn same_transfer(&self, other: &TransferRecord) -> bool {
        self.from_iban == other.from_iban
            && self.to_iban == other.to_iban
            && self.transfer_date == other.transfer_date
            && self.transfer_amount == other.transfer_amount
            && self.transfer_concept == other.transfer_concept
            && self.transfer_type == other.transfer_type
    }

    /// Recompute the code from the stored fields.
    pub fn computed_code(&self) -> String {
        transfer_code(
            &self.from_iban,
            &self.to_iban,
            self.transfer_type,
            &self.transfer_concept,
            self.transfer_date,
            self.transfer_amount,
            self.time_stamp,
        )
    }
}

fn transfer_code(
    from_iban: &Iban,
    to_iban: &Iban,
    transfer_type: TransferType,
    concept: &Concept,
    transfer_date: TransferDate,
    transfer_amount: TransferAmount,
    created_at: DateTime<Utc>,
) -> String {
    // Object keys serialize sorted, so the canonical text is stable.
    let canonical = serde_json::json!({
        "from_iban": from_iban.as_str(),
        "to_iban": to_iban.as_str(),
        "transfer_type": transfer_type.as_str(),
        "concept": concept.as_str(),
        "transfer_date": transfer_date.to_string(),
        "transfer_amount": transfer_amount.to_string(),
        "time_stamp": created_at.to_rfc3339(),
    });

    let digest = Md5::digest(format!("Transfer:{canonical}").as_bytes());
    hex::encode(digest)
}
