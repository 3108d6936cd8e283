//! Spanish IBAN value object and ISO 7064 mod-97 checksum.
//!
//! Only the Spanish layout is accepted: the country code `ES`, two check
//! digits and a 20-digit BBAN (24 characters in total).

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AccountError, AccountResult};
use crate::value_object::ValueObject;

const COUNTRY_CODE: &str = "ES";
const BBAN_LEN: usize = 20;

static SPANISH_IBAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ES[0-9]{22}$").expect("static IBAN pattern"));

/// A validated Spanish IBAN.
///
/// Construction goes through [`Iban::parse`], so holding an `Iban` means the
/// format and check digits were verified. Deserialization trusts the stored
/// value and does not re-run the checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iban(String);

impl ValueObject for Iban {}

impl Iban {
    /// Validate `raw` and wrap it unchanged.
    pub fn parse(raw: &str) -> AccountResult<Self> {
        if !SPANISH_IBAN.is_match(raw) {
            return Err(AccountError::invalid_format());
        }

        // The pattern guarantees two ASCII digits at positions 2..4.
        let declared: u32 = raw[2..4]
            .parse()
            .map_err(|_| AccountError::invalid_format())?;

        if declared != expected_check_digits(raw) {
            return Err(AccountError::invalid_check_digit());
        }

        Ok(Self(raw.to_string()))
    }

    /// Build a Spanish IBAN from its 20-digit BBAN, computing the check digits.
    pub fn from_bban(bban: &str) -> AccountResult<Self> {
        if bban.len() != BBAN_LEN || !bban.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountError::invalid_format());
        }

        let placeholder = format!("{COUNTRY_CODE}00{bban}");
        let digits = expected_check_digits(&placeholder);
        Ok(Self(format!("{COUNTRY_CODE}{digits:02}{bban}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two declared check digits.
    pub fn check_digits(&self) -> &str {
        &self.0[2..4]
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Iban {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Iban {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate an IBAN string, returning it unchanged on success.
pub fn validate(iban: &str) -> AccountResult<Iban> {
    Iban::parse(iban)
}

/// Check digits an IBAN should carry: `98 - (rearranged mod 97)`.
///
/// The declared check digits are replaced with `00`, the first four
/// characters move to the end and letters expand to `A=10 .. Z=35`.
fn expected_check_digits(iban: &str) -> u32 {
    let rearranged = iban[4..].chars().chain(iban[..2].chars()).chain("00".chars());
    98 - mod97(rearranged)
}

/// Remainder modulo 97 of the numeral spelled by `chars`.
///
/// Reduces one digit at a time, so numerals of any length fit in a `u32`.
fn mod97(chars: impl Iterator<Item = char>) -> u32 {
    chars.fold(0u32, |rem, c| match c {
        '0'..='9' => (rem * 10 + c.to_digit(10).unwrap_or(0)) % 97,
        'A'..='Z' => (rem * 100 + (c as u32 - 'A' as u32 + 10)) % 97,
        // unreachable for pattern-checked input
        _ => rem,
    })
}
