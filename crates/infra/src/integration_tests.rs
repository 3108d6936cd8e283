//! Integration tests for the file-backed pipeline.
//!
//! Tests: raw input → AccountManager → JsonFileStore → JSON files
//!
//! Verifies:
//! - Accepted operations land in the right file with the stored code/signature
//! - Rejected operations leave every store file byte-for-byte unchanged
//! - Balance queries append snapshots and never mutate the transaction log

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use serde_json::Value as JsonValue;

    use forgebank_core::{ErrorKind, FixedClock};

    use crate::account_manager::AccountManager;
    use crate::config::StoreConfig;
    use crate::ledger_store::{JsonFileStore, LedgerStore};

    const FROM: &str = "ES6211110783482828975098";
    const TO: &str = "ES8658342044541216872704";
    const ACCOUNT: &str = "ES3559005439021242088295";

    const TRANSACTIONS: &str = r#"[
  {"IBAN": "ES3559005439021242088295", "concept": "Salary", "amount": "5000.00"},
  {"IBAN": "ES8658342044541216872704", "concept": "Groceries", "amount": "-120.40"},
  {"IBAN": "ES3559005439021242088295", "concept": "Refund", "amount": 4368.29},
  {"IBAN": "ES3559005439021242088295", "concept": "Rent", "amount": "-100"}
]"#;

    type Manager = AccountManager<JsonFileStore, FixedClock>;

    fn setup(dir: &Path) -> Manager {
        let config = StoreConfig::in_dir(dir);
        fs::write(&config.transactions, TRANSACTIONS).unwrap();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 26, 14, 0, 0).unwrap());
        AccountManager::with_clock(JsonFileStore::new(config), clock)
    }

    fn read_json(path: &Path) -> JsonValue {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn write_intent(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn transfer_is_written_with_its_code() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());

        let code = mngr
            .submit_transfer(FROM, TO, "Monthly rent payment", "URGENT", "01/04/2025", "150.25")
            .unwrap();
        assert_eq!(code.len(), 32);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit()));

        let stored = read_json(&mngr.store().config().transfers);
        let entry = &stored[0];
        assert_eq!(entry["from_iban"], FROM);
        assert_eq!(entry["to_iban"], TO);
        assert_eq!(entry["transfer_type"], "URGENT");
        assert_eq!(entry["transfer_concept"], "Monthly rent payment");
        assert_eq!(entry["transfer_date"], "01/04/2025");
        assert_eq!(entry["transfer_amount"], 150.25);
        assert_eq!(entry["transfer_code"], code.as_str());
    }

    #[test]
    fn rejected_transfer_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());
        mngr.submit_transfer(FROM, TO, "Monthly rent payment", "URGENT", "01/04/2025", "150.25")
            .unwrap();
        let before = fs::read(&mngr.store().config().transfers).unwrap();

        let duplicate = mngr
            .submit_transfer(FROM, TO, "Monthly rent payment", "URGENT", "01/04/2025", "150.25")
            .unwrap_err();
        assert_eq!(duplicate.kind(), ErrorKind::DuplicateTransfer);

        let past = mngr
            .submit_transfer(FROM, TO, "Monthly rent payment", "URGENT", "25/03/2025", "150.25")
            .unwrap_err();
        assert_eq!(past.kind(), ErrorKind::DateInThePast);

        let too_large = mngr
            .submit_transfer(FROM, TO, "Monthly rent payment", "URGENT", "01/04/2025", "10000.01")
            .unwrap_err();
        assert_eq!(too_large.kind(), ErrorKind::InvalidAmount);

        assert_eq!(fs::read(&mngr.store().config().transfers).unwrap(), before);
    }

    #[test]
    fn deposit_round_trip_through_intent_file() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());
        let intent = write_intent(
            dir.path(),
            "deposit.json",
            r#"{"IBAN": "ES3559005439021242088295", "AMOUNT": "EUR 1000.00"}"#,
        );

        let signature = mngr.record_deposit(&intent).unwrap();
        assert_eq!(signature.len(), 64);

        let stored = mngr.find_deposit(&signature).unwrap().unwrap();
        assert_eq!(stored.to_iban.as_str(), ACCOUNT);
        assert_eq!(stored.deposit_amount.value(), dec!(1000.00));
        assert_eq!(stored.computed_signature(), signature);

        let raw = read_json(&mngr.store().config().deposits);
        assert_eq!(raw[0]["alg"], "SHA-256");
        assert_eq!(raw[0]["type"], "DEPOSIT");
        assert_eq!(raw[0]["deposit_amount"], 1000.0);
    }

    #[test]
    fn rejected_deposits_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());

        let cases = [
            (r#"{"IBAN": "ES3559005439021242088295", "AMOUNT": "EUR 0000.00"}"#, ErrorKind::InvalidDepositAmount),
            (r#"{"IBAN": "ES3559005439021242088295", "AMOUNT": "EUR 100.00"}"#, ErrorKind::InvalidDepositAmount),
            (r#"{"IBAN": "ES1559005439021242088295", "AMOUNT": "EUR 1000.00"}"#, ErrorKind::InvalidCheckDigit),
            (r#"{"IBAM": "ES3559005439021242088295", "AMOUNT": "EUR 1000.00"}"#, ErrorKind::MissingField),
            (r#"{"IBAN": "ES3559005439021242088295", "AMOUNT": "EUR 1000.00""#, ErrorKind::CorruptStore),
        ];

        for (i, (contents, kind)) in cases.into_iter().enumerate() {
            let intent = write_intent(dir.path(), &format!("intent_{i}.json"), contents);
            let err = mngr.record_deposit(&intent).unwrap_err();
            assert_eq!(err.kind(), kind, "intent {contents}");
        }

        let err = mngr.record_deposit(dir.path().join("nowhere.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

        assert!(!mngr.store().config().deposits.exists());
    }

    #[test]
    fn balance_appends_a_snapshot_per_query() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());
        let log_before = fs::read(&mngr.store().config().transactions).unwrap();

        assert_eq!(mngr.get_balance(ACCOUNT).unwrap(), dec!(9268.29));
        assert_eq!(mngr.get_balance(ACCOUNT).unwrap(), dec!(9268.29));

        let raw = read_json(&mngr.store().config().balances);
        assert_eq!(raw.as_array().unwrap().len(), 2);
        assert_eq!(raw[0]["IBAN"], ACCOUNT);
        assert_eq!(raw[0]["BALANCE"], 9268.29);

        assert_eq!(mngr.balance_history(ACCOUNT).unwrap().len(), 2);
        assert!(mngr.balance_history(TO).unwrap().is_empty());
        assert_eq!(fs::read(&mngr.store().config().transactions).unwrap(), log_before);
    }

    #[test]
    fn balance_failures_write_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());

        let err = mngr.get_balance("ES9420805801101234567891").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IbanNotFound);

        fs::write(&mngr.store().config().transactions, "[{").unwrap();
        let err = mngr.get_balance(ACCOUNT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStore);

        fs::remove_file(&mngr.store().config().transactions).unwrap();
        let err = mngr.get_balance(ACCOUNT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

        assert!(mngr.store().balances().unwrap().is_empty());
    }

    #[test]
    fn overflowing_log_is_reported_not_panicked() {
        let dir = tempfile::tempdir().unwrap();
        let mngr = setup(dir.path());
        fs::write(
            &mngr.store().config().transactions,
            r#"[
  {"IBAN": "ES3559005439021242088295", "amount": "50000000000000000000000000000"},
  {"IBAN": "ES3559005439021242088295", "amount": "50000000000000000000000000000"}
]"#,
        )
        .unwrap();

        let err = mngr.get_balance(ACCOUNT).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStore);
        assert!(!mngr.store().config().balances.exists());
    }
}
