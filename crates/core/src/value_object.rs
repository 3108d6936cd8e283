//! Value object trait: equality by value, not identity.
//!
//! Account-management records (IBANs, transfer requests, deposits, balance
//! snapshots) have no identity of their own. They are built once, compared by
//! their attributes and never mutated after construction; derived values such
//! as signatures are recomputed from the stored fields on demand.

/// Marker trait for value objects.
///
/// Requires:
/// - **Clone**: records are copied into the store, never shared mutably
/// - **PartialEq**: records are compared by their attribute values
/// - **Debug**: records show up in logs and test failures
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Amount(rust_decimal::Decimal);
///
/// impl ValueObject for Amount {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
