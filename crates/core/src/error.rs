//! Account-management error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the account-management layers.
pub type AccountResult<T> = Result<T, AccountError>;

/// Machine-readable category of an [`AccountError`].
///
/// Callers branch on the kind; the message carried by the error is for humans.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidFormat,
    InvalidCheckDigit,
    InvalidConcept,
    InvalidTransferType,
    InvalidDateFormat,
    DateInThePast,
    InvalidAmount,
    InvalidDepositAmount,
    MissingField,
    DuplicateTransfer,
    IbanNotFound,
    CorruptStore,
    StoreUnavailable,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

/// Account-management error.
///
/// Every failure is terminal and reported synchronously. Validation variants
/// are raised before any side effect; store variants come from persistence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// The IBAN does not match the Spanish layout (`ES` + 22 digits).
    #[error("{0}")]
    InvalidFormat(String),

    /// The IBAN check digits do not match the mod-97 checksum.
    #[error("{0}")]
    InvalidCheckDigit(String),

    #[error("{0}")]
    InvalidConcept(String),

    #[error("{0}")]
    InvalidTransferType(String),

    /// Malformed or out-of-range transfer date.
    #[error("{0}")]
    InvalidDateFormat(String),

    #[error("{0}")]
    DateInThePast(String),

    #[error("{0}")]
    InvalidAmount(String),

    #[error("{0}")]
    InvalidDepositAmount(String),

    /// A required key is missing from an input document.
    #[error("{0}")]
    MissingField(String),

    /// A transfer with the same logical fields is already stored.
    #[error("{0}")]
    DuplicateTransfer(String),

    #[error("{0}")]
    IbanNotFound(String),

    /// A store or input file holds malformed JSON.
    #[error("{0}")]
    CorruptStore(String),

    /// A store or input file could not be read or written.
    #[error("{0}")]
    StoreUnavailable(String),
}

impl AccountError {
    pub fn invalid_format() -> Self {
        Self::InvalidFormat("Invalid IBAN format".to_string())
    }

    pub fn invalid_check_digit() -> Self {
        Self::InvalidCheckDigit("Invalid IBAN control digit".to_string())
    }

    pub fn invalid_concept() -> Self {
        Self::InvalidConcept("Invalid concept format".to_string())
    }

    pub fn invalid_transfer_type() -> Self {
        Self::InvalidTransferType("Invalid transfer type".to_string())
    }

    pub fn invalid_date_format() -> Self {
        Self::InvalidDateFormat("Invalid date format".to_string())
    }

    pub fn date_in_the_past() -> Self {
        Self::DateInThePast("Transfer date must be today or later.".to_string())
    }

    pub fn invalid_amount() -> Self {
        Self::InvalidAmount("Invalid transfer amount".to_string())
    }

    pub fn invalid_deposit_amount(msg: impl Into<String>) -> Self {
        Self::InvalidDepositAmount(msg.into())
    }

    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    pub fn duplicate_transfer() -> Self {
        Self::DuplicateTransfer("Duplicated transfer in transfer list".to_string())
    }

    pub fn iban_not_found() -> Self {
        Self::IbanNotFound("IBAN not found".to_string())
    }

    pub fn corrupt_store(msg: impl Into<String>) -> Self {
        Self::CorruptStore(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Self::InvalidCheckDigit(_) => ErrorKind::InvalidCheckDigit,
            Self::InvalidConcept(_) => ErrorKind::InvalidConcept,
            Self::InvalidTransferType(_) => ErrorKind::InvalidTransferType,
            Self::InvalidDateFormat(_) => ErrorKind::InvalidDateFormat,
            Self::DateInThePast(_) => ErrorKind::DateInThePast,
            Self::InvalidAmount(_) => ErrorKind::InvalidAmount,
            Self::InvalidDepositAmount(_) => ErrorKind::InvalidDepositAmount,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::DuplicateTransfer(_) => ErrorKind::DuplicateTransfer,
            Self::IbanNotFound(_) => ErrorKind::IbanNotFound,
            Self::CorruptStore(_) => ErrorKind::CorruptStore,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidFormat(m)
            | Self::InvalidCheckDigit(m)
            | Self::InvalidConcept(m)
            | Self::InvalidTransferType(m)
            | Self::InvalidDateFormat(m)
            | Self::DateInThePast(m)
            | Self::InvalidAmount(m)
            | Self::InvalidDepositAmount(m)
            | Self::MissingField(m)
            | Self::DuplicateTransfer(m)
            | Self::IbanNotFound(m)
            | Self::CorruptStore(m)
            | Self::StoreUnavailable(m) => m,
        }
    }

    /// True for errors raised by field validation (before any IO).
    pub fn is_validation(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::DuplicateTransfer
                | ErrorKind::IbanNotFound
                | ErrorKind::CorruptStore
                | ErrorKind::StoreUnavailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_message_follow_the_variant() {
        let err = AccountError::invalid_check_digit();
        assert_eq!(err.kind(), ErrorKind::InvalidCheckDigit);
        assert_eq!(err.message(), "Invalid IBAN control digit");
        assert_eq!(err.to_string(), "Invalid IBAN control digit");
    }

    #[test]
    fn store_errors_are_not_validation_errors() {
        assert!(AccountError::invalid_concept().is_validation());
        assert!(AccountError::missing_field("Error - Invalid Key in JSON").is_validation());
        assert!(!AccountError::duplicate_transfer().is_validation());
        assert!(!AccountError::store_unavailable("Wrong file  or file path").is_validation());
    }

    #[test]
    fn kind_serializes_as_its_name() {
        let json = serde_json::to_string(&ErrorKind::DateInThePast).unwrap();
        assert_eq!(json, "\"DateInThePast\"");
        assert_eq!(ErrorKind::IbanNotFound.to_string(), "IbanNotFound");
    }
}
