//! Field grammars for transfers and deposits.
//!
//! Each field is a small value object whose only constructor is `parse`, so a
//! value of the type is proof the grammar was checked. Stored records are
//! deserialized without re-validation: the store is trusted.
//!
//! | Field            | Grammar                                                  | Error                  |
//! |------------------|----------------------------------------------------------|------------------------|
//! | concept          | two or more letter-only words, single spaces, 10-30 chars | `InvalidConcept`       |
//! | transfer date    | `DD/MM/YYYY`, real date, not before today, 2025-2050     | `InvalidDateFormat` / `DateInThePast` |
//! | transfer amount  | decimal, at most 2 fraction digits, 10-10000             | `InvalidAmount`        |
//! | deposit amount   | `EUR dddd.dd`, greater than zero                         | `InvalidDepositAmount` |

use core::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use forgebank_core::{AccountError, AccountResult, ValueObject};

const CONCEPT_MIN_LEN: usize = 10;
const CONCEPT_MAX_LEN: usize = 30;

const TRANSFER_DATE_FORMAT: &str = "%d/%m/%Y";
const MIN_TRANSFER_YEAR: i32 = 2025;
const MAX_TRANSFER_YEAR: i32 = 2050;

const MIN_TRANSFER_AMOUNT: Decimal = dec!(10);
const MAX_TRANSFER_AMOUNT: Decimal = dec!(10000);
const MAX_FRACTION_DIGITS: u32 = 2;

const DEPOSIT_CURRENCY_PREFIX: &str = "EUR ";

static CONCEPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(\s[a-zA-Z]+)+$").expect("static concept pattern"));

static TRANSFER_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(([0-2][0-9]|3[0-1])/(0[0-9]|1[0-2])/[0-9]{4})$").expect("static date pattern")
});

static DEPOSIT_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^EUR [0-9]{4}\.[0-9]{2}$").expect("static deposit amount pattern")
});

/// Free-text transfer concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Concept(String);

impl ValueObject for Concept {}

impl Concept {
    pub fn parse(raw: &str) -> AccountResult<Self> {
        let len = raw.chars().count();
        if !(CONCEPT_MIN_LEN..=CONCEPT_MAX_LEN).contains(&len) || !CONCEPT.is_match(raw) {
            return Err(AccountError::invalid_concept());
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Concept {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution date of a transfer, rendered as `DD/MM/YYYY`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferDate(NaiveDate);

impl ValueObject for TransferDate {}

impl TransferDate {
    /// Parse `raw` and check it against `today` (UTC).
    ///
    /// The past-date check runs before the year range, so a date in 2020
    /// reports `DateInThePast` while one in 2051 reports `InvalidDateFormat`.
    pub fn parse(raw: &str, today: NaiveDate) -> AccountResult<Self> {
        if !TRANSFER_DATE.is_match(raw) {
            return Err(AccountError::invalid_date_format());
        }

        let date = NaiveDate::parse_from_str(raw, TRANSFER_DATE_FORMAT)
            .map_err(|_| AccountError::invalid_date_format())?;

        if date < today {
            return Err(AccountError::date_in_the_past());
        }

        if !(MIN_TRANSFER_YEAR..=MAX_TRANSFER_YEAR).contains(&date.year()) {
            return Err(AccountError::invalid_date_format());
        }

        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl core::fmt::Display for TransferDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format(TRANSFER_DATE_FORMAT))
    }
}

impl Serialize for TransferDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransferDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, TRANSFER_DATE_FORMAT)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Transfer amount in euros.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl ValueObject for TransferAmount {}

impl TransferAmount {
    /// Parse a decimal amount.
    ///
    /// Trailing fraction zeros are not significant: `10.500` is `10.5`.
    pub fn parse(raw: &str) -> AccountResult<Self> {
        let amount = parse_decimal(raw).ok_or_else(AccountError::invalid_amount)?;

        if amount.normalize().scale() > MAX_FRACTION_DIGITS {
            return Err(AccountError::invalid_amount());
        }

        if amount < MIN_TRANSFER_AMOUNT || amount > MAX_TRANSFER_AMOUNT {
            return Err(AccountError::invalid_amount());
        }

        Ok(Self(amount))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for TransferAmount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.normalize(), f)
    }
}

/// Deposit amount in euros, parsed from `EUR dddd.dd`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepositAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl ValueObject for DepositAmount {}

impl DepositAmount {
    pub fn parse(raw: &str) -> AccountResult<Self> {
        if !DEPOSIT_AMOUNT.is_match(raw) {
            return Err(AccountError::invalid_deposit_amount(
                "Error - Invalid deposit amount",
            ));
        }

        let amount = raw
            .strip_prefix(DEPOSIT_CURRENCY_PREFIX)
            .and_then(|digits| Decimal::from_str(digits).ok())
            .ok_or_else(|| AccountError::invalid_deposit_amount("Error - Invalid deposit amount"))?;

        if amount <= Decimal::ZERO {
            return Err(AccountError::invalid_deposit_amount(
                "Error - Deposit must be greater than 0",
            ));
        }

        Ok(Self(amount))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for DepositAmount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.normalize(), f)
    }
}

/// Lenient decimal parsing: surrounding whitespace, sign and scientific
/// notation are accepted.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
