//! Transactions and balance aggregation.
//!
//! The transaction log is produced by a collaborator; this module only reads
//! it. Every balance computation yields a new [`BalanceSnapshot`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use forgebank_core::{AccountError, AccountResult, Iban, ValueObject};

use crate::timestamp;
use crate::validation::parse_decimal;

/// One entry of the collaborator-produced transaction log.
///
/// Amounts are signed and may be JSON strings (`"+1234.56"`) or numbers.
/// Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "IBAN")]
    pub iban: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: Decimal,
}

impl ValueObject for Transaction {}

/// Balance of an account at a point in time (append-only history).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    #[serde(rename = "IBAN")]
    pub iban: Iban,
    #[serde(rename = "time", deserialize_with = "timestamp::lenient")]
    pub computed_at: DateTime<Utc>,
    #[serde(rename = "BALANCE", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl ValueObject for BalanceSnapshot {}

impl BalanceSnapshot {
    pub fn new(iban: Iban, balance: Decimal, computed_at: DateTime<Utc>) -> Self {
        Self {
            iban,
            computed_at,
            balance,
        }
    }
}

/// Sum of the amounts recorded for `iban`.
///
/// `Ok(None)` when the log has no entry for it. A sum outside the `Decimal`
/// range is `CorruptStore`.
pub fn balance_of(iban: &Iban, transactions: &[Transaction]) -> AccountResult<Option<Decimal>> {
    let mut amounts = transactions
        .iter()
        .filter(|t| t.iban == iban.as_str())
        .map(|t| t.amount);

    let Some(first) = amounts.next() else {
        return Ok(None);
    };

    amounts
        .try_fold(first, |acc, amount| acc.checked_add(amount))
        .map(Some)
        .ok_or_else(|| AccountError::corrupt_store(format!("Balance of {iban} overflows")))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(f64),
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(raw) => parse_decimal(&raw),
        RawAmount::Number(n) => parse_decimal(&n.to_string()),
    };
    parsed.ok_or_else(|| serde::de::Error::custom("transaction amount is not a decimal number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn iban() -> Iban {
        Iban::parse("ES3559005439021242088295").unwrap()
    }

    #[test]
    fn transactions_accept_string_and_number_amounts() {
        let json = r#"[
            {"IBAN": "ES3559005439021242088295", "amount": "+1000.50", "concept": "payroll"},
            {"IBAN": "ES3559005439021242088295", "amount": -200.25},
            {"IBAN": "ES9420805801101234567891", "amount": "50"}
        ]"#;
        let log: Vec<Transaction> = serde_json::from_str(json).unwrap();

        assert_eq!(log.len(), 3);
        assert_eq!(log[0].amount, dec!(1000.50));
        assert_eq!(log[1].amount, dec!(-200.25));
    }

    #[test]
    fn unparseable_amount_is_a_decode_error() {
        let json = r#"[{"IBAN": "ES3559005439021242088295", "amount": "lots"}]"#;
        assert!(serde_json::from_str::<Vec<Transaction>>(json).is_err());
    }

    #[test]
    fn balance_sums_only_matching_entries() {
        let log = vec![
            Transaction { iban: iban().into_inner(), amount: dec!(1000.50) },
            Transaction { iban: "ES9420805801101234567891".into(), amount: dec!(999) },
            Transaction { iban: iban().into_inner(), amount: dec!(-200.25) },
        ];
        assert_eq!(balance_of(&iban(), &log).unwrap(), Some(dec!(800.25)));
    }

    #[test]
    fn balance_of_unknown_iban_is_none() {
        let log = vec![Transaction { iban: "ES9420805801101234567891".into(), amount: dec!(10) }];
        assert_eq!(balance_of(&iban(), &log).unwrap(), None);
        assert_eq!(balance_of(&iban(), &[]).unwrap(), None);
    }

    #[test]
    fn matching_entries_summing_to_zero_still_count() {
        let log = vec![
            Transaction { iban: iban().into_inner(), amount: dec!(10) },
            Transaction { iban: iban().into_inner(), amount: dec!(-10) },
        ];
        assert_eq!(balance_of(&iban(), &log).unwrap(), Some(Decimal::ZERO));
    }

    #[test]
    fn snapshot_json_layout() {
        let at = Utc.with_ymd_and_hms(2025, 3, 26, 14, 0, 0).unwrap();
        let snapshot = BalanceSnapshot::new(iban(), dec!(9268.29), at);
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["IBAN"], "ES3559005439021242088295");
        assert_eq!(value["BALANCE"], 9268.29);
        assert!(value["time"].is_string());

        let back: BalanceSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn sum_outside_decimal_range_is_an_error_not_a_panic() {
        let json = r#"[
            {"IBAN": "ES3559005439021242088295", "amount": "50000000000000000000000000000"},
            {"IBAN": "ES3559005439021242088295", "amount": "50000000000000000000000000000"}
        ]"#;
        let log: Vec<Transaction> = serde_json::from_str(json).unwrap();

        let err = balance_of(&iban(), &log).unwrap_err();
        assert_eq!(err.kind(), forgebank_core::ErrorKind::CorruptStore);
    }

    #[test]
    fn snapshot_reads_epoch_seconds() {
        let json = r#"{"IBAN": "ES3559005439021242088295", "time": 1742997600.0, "BALANCE": 9268.29}"#;
        let snapshot: BalanceSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.computed_at, Utc.with_ymd_and_hms(2025, 3, 26, 14, 0, 0).unwrap());
        assert_eq!(snapshot.balance, dec!(9268.29));
    }
}
