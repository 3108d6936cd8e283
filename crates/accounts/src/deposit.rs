use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use forgebank_core::{Iban, ValueObject};

use crate::validation::DepositAmount;

/// Signature algorithm tag written with every deposit.
pub const DEPOSIT_ALG: &str = "SHA-256";
/// Record type tag written with every deposit.
pub const DEPOSIT_TYPE: &str = "DEPOSIT";

/// A validated deposit into an account (immutable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    to_iban: Iban,
    deposit_amount: DepositAmount,
    created_at: DateTime<Utc>,
}

impl ValueObject for Deposit {}

impl Deposit {
    pub fn new(to_iban: Iban, deposit_amount: DepositAmount, created_at: DateTime<Utc>) -> Self {
        Self {
            to_iban,
            deposit_amount,
            created_at,
        }
    }

    pub fn to_iban(&self) -> &Iban {
        &self.to_iban
    }

    pub fn deposit_amount(&self) -> DepositAmount {
        self.deposit_amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// SHA-256 hex digest over algorithm, type, IBAN, amount and capture time.
    pub fn deposit_signature(&self) -> String {
        deposit_signature(&self.to_iban, self.deposit_amount, self.created_at)
    }

    pub fn to_record(&self) -> DepositRecord {
        DepositRecord {
            alg: DEPOSIT_ALG.to_string(),
            record_type: DEPOSIT_TYPE.to_string(),
            to_iban: self.to_iban.clone(),
            deposit_amount: self.deposit_amount,
            deposit_date: self.created_at,
            deposit_signature: self.deposit_signature(),
        }
    }
}

/// Deposit as persisted in the deposits store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub alg: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub to_iban: Iban,
    pub deposit_amount: DepositAmount,
    #[serde(deserialize_with = "crate::timestamp::lenient")]
    pub deposit_date: DateTime<Utc>,
    pub deposit_signature: String,
}

impl ValueObject for DepositRecord {}

impl DepositRecord {
    /// Recompute the signature from the stored fields.
    pub fn computed_signature(&self) -> String {
        deposit_signature(&self.to_iban, self.deposit_amount, self.deposit_date)
    }
}

fn deposit_signature(to_iban: &Iban, amount: DepositAmount, created_at: DateTime<Utc>) -> String {
    let canonical = format!(
        "{{alg:{DEPOSIT_ALG},typ:{DEPOSIT_TYPE},iban:{to_iban},amount:{amount},deposit_date:{}}}",
        created_at.to_rfc3339()
    );
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn deposit(amount: &str, second: u32) -> Deposit {
        Deposit::new(
            Iban::parse("ES3559005439021242088295").unwrap(),
            DepositAmount::parse(amount).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 26, 14, 0, second).unwrap(),
        )
    }

    #[test]
    fn signature_is_sha256_hex_and_deterministic() {
        let a = deposit("EUR 1234.50", 0);
        let b = deposit("EUR 1234.50", 0);
        assert_eq!(a.deposit_signature(), b.deposit_signature());
        assert_eq!(a.deposit_signature().len(), 64);
    }

    #[test]
    fn signature_covers_amount_and_time() {
        let base = deposit("EUR 1234.50", 0);
        assert_ne!(base.deposit_signature(), deposit("EUR 1234.51", 0).deposit_signature());
        assert_ne!(base.deposit_signature(), deposit("EUR 1234.50", 1).deposit_signature());
    }

    #[test]
    fn record_json_layout_and_round_trip() {
        let record = deposit("EUR 1234.50", 0).to_record();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["alg"], "SHA-256");
        assert_eq!(value["type"], "DEPOSIT");
        assert_eq!(value["to_iban"], "ES3559005439021242088295");
        assert_eq!(value["deposit_amount"], 1234.5);
        assert_eq!(value["deposit_signature"], record.deposit_signature.as_str());

        let back: DepositRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.computed_signature(), record.deposit_signature);
    }

    #[test]
    fn record_with_epoch_deposit_date_reads_back() {
        let record = deposit("EUR 1234.50", 0).to_record();
        let mut value = serde_json::to_value(&record).unwrap();
        value["deposit_date"] = serde_json::json!(1742997600);

        let back: DepositRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.deposit_date, record.deposit_date);
        assert_eq!(back.computed_signature(), record.deposit_signature);
    }
}
