#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::TransactionType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn txn(d: &str, description: &str, amount: Decimal, kind: TransactionType, category: &str) -> Transaction {
    Transaction::new(date(d), description, amount, kind, category)
}

fn setup_test_data(repo: &Repository) -> Vec<Transaction> {
    let txns = vec![
        txn("2024-01-10", "Sale", dec!(150), TransactionType::Income, "Sales"),
        txn("2024-01-15", "Payroll", dec!(600), TransactionType::Expense, "Fixed Salaries"),
        txn("2024-02-01", "Corn purchase", dec!(75), TransactionType::Expense, "Raw Material"),
    ];
    txns.iter().map(|t| repo.create(t).unwrap()).collect()
}

// ── Initialization ────────────────────────────────────────────

#[test]
fn test_open_in_memory_is_empty() {
    let repo = Repository::open_in_memory().unwrap();
    assert!(repo.list_all().unwrap().is_empty());
    assert!(repo.list_unique_descriptions().unwrap().is_empty());
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn test_initialize_is_idempotent() {
    let repo = Repository::open_in_memory().unwrap();
    setup_test_data(&repo);
    repo.initialize().unwrap();
    assert_eq!(repo.count().unwrap(), 3);
}

// ── Create / read ─────────────────────────────────────────────

#[test]
fn test_create_assigns_id_and_roundtrips() {
    let repo = Repository::open_in_memory().unwrap();
    let new = txn("2024-03-02", "Catering", dec!(1234.56), TransactionType::Income, "Service");

    let stored = repo.create(&new).unwrap();
    let id = stored.id.unwrap();
    assert!(id > 0);

    let fetched = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(Transaction { id: None, ..fetched }, new);
}

#[test]
fn test_create_ignores_caller_id() {
    let repo = Repository::open_in_memory().unwrap();
    let mut new = txn("2024-03-02", "Tip", dec!(5), TransactionType::Income, "Service");
    new.id = Some(999);
    let stored = repo.create(&new).unwrap();
    assert_ne!(stored.id, Some(999));
    assert!(repo.get_by_id(999).unwrap().is_none());
}

#[test]
fn test_create_ids_are_unique() {
    let repo = Repository::open_in_memory().unwrap();
    let stored = setup_test_data(&repo);
    let mut ids: Vec<i64> = stored.iter().map(|t| t.id.unwrap()).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_create_rejects_invalid_before_writing() {
    let repo = Repository::open_in_memory().unwrap();

    let empty_desc = txn("2024-01-01", "", dec!(10), TransactionType::Income, "Sales");
    let zero = txn("2024-01-01", "Sale", Decimal::ZERO, TransactionType::Income, "Sales");
    let negative = txn("2024-01-01", "Sale", dec!(-1), TransactionType::Income, "Sales");
    let no_category = txn("2024-01-01", "Sale", dec!(10), TransactionType::Income, " ");

    for bad in [empty_desc, zero, negative, no_category] {
        let err = repo.create(&bad).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "unexpected error: {err}");
    }
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn test_get_by_id_not_found() {
    let repo = Repository::open_in_memory().unwrap();
    assert!(repo.get_by_id(99999).unwrap().is_none());
}

#[test]
fn test_list_all_date_descending() {
    let repo = Repository::open_in_memory().unwrap();
    setup_test_data(&repo);

    let all = repo.list_all().unwrap();
    let dates: Vec<String> = all.iter().map(|t| t.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-02-01", "2024-01-15", "2024-01-10"]);
}

#[test]
fn test_list_all_same_date_keeps_insertion_order() {
    let repo = Repository::open_in_memory().unwrap();
    for name in ["First", "Second", "Third"] {
        repo.create(&txn("2024-05-05", name, dec!(1), TransactionType::Income, "Sales"))
            .unwrap();
    }
    repo.create(&txn("2024-05-06", "Later", dec!(1), TransactionType::Income, "Sales"))
        .unwrap();

    let names: Vec<String> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(names, vec!["Later", "First", "Second", "Third"]);
}

#[test]
fn test_amount_precision_survives_storage() {
    let repo = Repository::open_in_memory().unwrap();
    let stored = repo
        .create(&txn("2024-01-01", "Coins", dec!(0.10), TransactionType::Income, "Sales"))
        .unwrap();
    let fetched = repo.get_by_id(stored.id.unwrap()).unwrap().unwrap();
    assert_eq!(fetched.amount, dec!(0.1));
}

#[test]
fn test_create_returns_amount_as_stored() {
    let repo = Repository::open_in_memory().unwrap();
    let amount: Decimal = "33.333333333333333".parse().unwrap();
    let stored = repo
        .create(&txn("2024-01-01", "Thirds", amount, TransactionType::Income, "Sales"))
        .unwrap();
    let fetched = repo.get_by_id(stored.id.unwrap()).unwrap().unwrap();
    assert_eq!(stored, fetched);
}

#[test]
fn test_type_stored_with_legacy_labels() {
    let repo = Repository::open_in_memory().unwrap();
    setup_test_data(&repo);
    let labels: Vec<String> = {
        let mut stmt = repo
            .conn
            .prepare("SELECT type FROM transactions ORDER BY id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        rows
    };
    assert_eq!(labels, vec!["Ingreso", "Gasto", "Gasto"]);
}

#[test]
fn test_unreadable_rows_are_skipped_by_list_all() {
    let repo = Repository::open_in_memory().unwrap();
    setup_test_data(&repo);
    repo.conn
        .execute_batch(
            "INSERT INTO transactions (date, description, amount, type, category)
             VALUES ('2024-01-01', 'Odd', 1.0, 'Transferencia', 'Other');
             INSERT INTO transactions (date, description, amount, type, category)
             VALUES ('someday', 'Undated', 2.0, 'Gasto', 'Other');",
        )
        .unwrap();

    let names: Vec<String> = repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|t| t.description)
        .collect();
    assert_eq!(names, vec!["Corn purchase", "Payroll", "Sale"]);
    assert_eq!(repo.count().unwrap(), 5);
}

#[test]
fn test_unknown_stored_type_by_id_is_operation_error() {
    let repo = Repository::open_in_memory().unwrap();
    repo.conn
        .execute(
            "INSERT INTO transactions (date, description, amount, type, category)
             VALUES ('2024-01-01', 'Odd', 1.0, 'Transferencia', 'Other')",
            [],
        )
        .unwrap();
    let err = repo.get_by_id(1).unwrap_err();
    assert!(matches!(err, Error::StorageOperationFailed(_)));
}

// ── Lookups ───────────────────────────────────────────────────

#[test]
fn test_latest_by_description_picks_most_recent() {
    let repo = Repository::open_in_memory().unwrap();
    repo.create(&txn("2024-01-01", "Flour", dec!(20), TransactionType::Expense, "Raw Material"))
        .unwrap();
    repo.create(&txn("2024-03-01", "Flour", dec!(25), TransactionType::Expense, "Raw Material"))
        .unwrap();
    repo.create(&txn("2024-02-01", "Flour", dec!(22), TransactionType::Expense, "Other Expenses"))
        .unwrap();

    let latest = repo.get_latest_by_description("Flour").unwrap().unwrap();
    assert_eq!(latest.amount, dec!(25));
    assert_eq!(latest.date, date("2024-03-01"));
}

#[test]
fn test_latest_by_description_exact_match_only() {
    let repo = Repository::open_in_memory().unwrap();
    setup_test_data(&repo);
    assert!(repo.get_latest_by_description("sale").unwrap().is_none());
    assert!(repo.get_latest_by_description("Sal").unwrap().is_none());
    assert!(repo.get_latest_by_description("Sale").unwrap().is_some());
}

#[test]
fn test_unique_descriptions_sorted_without_duplicates() {
    let repo = Repository::open_in_memory().unwrap();
    for name in ["Rent", "Bread", "Rent", "Advertising", "Bread"] {
        repo.create(&txn("2024-01-01", name, dec!(1), TransactionType::Expense, "Other"))
            .unwrap();
    }
    assert_eq!(
        repo.list_unique_descriptions().unwrap(),
        vec!["Advertising", "Bread", "Rent"]
    );
}

// ── Update / delete ───────────────────────────────────────────

#[test]
fn test_update_overwrites_all_fields() {
    let repo = Repository::open_in_memory().unwrap();
    let stored = setup_test_data(&repo);
    let mut edited = stored[1].clone();
    edited.date = date("2024-01-31");
    edited.description = "January payroll".into();
    edited.amount = dec!(650.25);
    edited.kind = TransactionType::Income;
    edited.category = "Other Income".into();

    repo.update(&edited).unwrap();
    let fetched = repo.get_by_id(edited.id.unwrap()).unwrap().unwrap();
    assert_eq!(fetched, edited);

    // Other rows untouched
    let first = repo.get_by_id(stored[0].id.unwrap()).unwrap().unwrap();
    assert_eq!(first, stored[0]);
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let repo = Repository::open_in_memory().unwrap();
    let mut ghost = txn("2024-01-01", "Ghost", dec!(1), TransactionType::Income, "Sales");
    ghost.id = Some(42);
    assert!(matches!(repo.update(&ghost), Err(Error::NotFound(42))));
}

#[test]
fn test_update_without_id_is_rejected() {
    let repo = Repository::open_in_memory().unwrap();
    let unsaved = txn("2024-01-01", "Unsaved", dec!(1), TransactionType::Income, "Sales");
    assert!(matches!(
        repo.update(&unsaved),
        Err(Error::Validation(ValidationError::MissingId))
    ));
}

#[test]
fn test_update_validates_fields() {
    let repo = Repository::open_in_memory().unwrap();
    let stored = setup_test_data(&repo);
    let mut edited = stored[0].clone();
    edited.amount = Decimal::ZERO;
    assert!(matches!(repo.update(&edited), Err(Error::Validation(_))));
    let fetched = repo.get_by_id(stored[0].id.unwrap()).unwrap().unwrap();
    assert_eq!(fetched.amount, dec!(150));
}

#[test]
fn test_delete() {
    let repo = Repository::open_in_memory().unwrap();
    let stored = setup_test_data(&repo);
    let id = stored[0].id.unwrap();

    repo.delete(id).unwrap();
    assert!(repo.get_by_id(id).unwrap().is_none());
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let repo = Repository::open_in_memory().unwrap();
    setup_test_data(&repo);
    repo.delete(12345).unwrap();
    assert_eq!(repo.count().unwrap(), 3);
}
