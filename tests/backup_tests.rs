// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use outgo::backup;
use outgo::db;
use outgo::{cli, commands};
use outgo::error::StoreError;
use outgo::models::{
    CategoryFamily, InstallmentPeriodicity, NewExpense, NewInstallment, NewSaving,
    NewSubscription, Periodicity, SavingKind, SubscriptionPatch,
};
use outgo::store::{categories, expenses, installments, savings, subscriptions, users};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn populate(conn: &mut Connection) {
    users::set_user(conn, "Ada", "1234").unwrap();

    let food = categories::id_for_name(conn, CategoryFamily::Expense, "Food").unwrap();
    expenses::create(
        conn,
        &NewExpense {
            amount: dec("12.50"),
            description: "lunch".into(),
            category_id: food,
            date: date("2024-03-10"),
            notes: Some("with colleagues".into()),
        },
    )
    .unwrap();

    let streaming =
        categories::id_for_name(conn, CategoryFamily::Subscription, "Video Streaming").unwrap();
    let sub = subscriptions::create(
        conn,
        &NewSubscription {
            name: "Streamflix".into(),
            amount: dec("9.99"),
            category_id: streaming,
            periodicity: Periodicity::Monthly,
            start_date: Some(date("2024-01-15")),
            notes: None,
        },
        date("2024-01-15"),
    )
    .unwrap();
    // a price change so the history has a closed and an open entry
    subscriptions::update(
        conn,
        sub.id,
        &SubscriptionPatch {
            amount: Some(dec("12.99")),
            ..Default::default()
        },
        date("2024-06-10"),
    )
    .unwrap();

    let electronics =
        categories::id_for_name(conn, CategoryFamily::Installment, "Electronics").unwrap();
    let purchase = installments::create(
        conn,
        &NewInstallment {
            name: "Laptop".into(),
            total_amount: dec("1200"),
            total_installments: 12,
            installment_amount: dec("100"),
            category_id: electronics,
            periodicity: InstallmentPeriodicity::Monthly,
            start_date: date("2024-01-15"),
            notes: None,
        },
    )
    .unwrap();
    let first = installments::schedule(conn, purchase.id).unwrap()[0].clone();
    installments::set_payment_paid(conn, first.id, true, date("2024-01-20")).unwrap();

    let pot = savings::create(
        conn,
        &NewSaving {
            name: "Emergency fund".into(),
            kind: SavingKind::Bank,
            notes: None,
        },
    )
    .unwrap();
    savings::deposit(conn, pot.id, dec("500"), Some("seed")).unwrap();
    savings::withdraw(conn, pot.id, dec("120"), None).unwrap();
}

#[test]
fn export_requires_a_profile() {
    let conn = setup();
    let err = backup::export(&conn).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn round_trip_preserves_entities_children_and_ids() {
    let mut source = setup();
    populate(&mut source);
    let doc = backup::export(&source).unwrap();

    let mut target = setup();
    backup::import(&mut target, &doc).unwrap();

    assert_eq!(users::current_user(&target).unwrap().unwrap().name, "Ada");

    let before = expenses::get_all(&source).unwrap();
    let after = expenses::get_all(&target).unwrap();
    assert_eq!(before.len(), after.len());
    assert_eq!(before[0].id, after[0].id);
    assert_eq!(before[0].amount, after[0].amount);
    assert_eq!(before[0].category_id, after[0].category_id);

    let subs = subscriptions::get_all(&target).unwrap();
    assert_eq!(subs.len(), 1);
    let history = subscriptions::price_history(&target, subs[0].id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().filter(|e| e.valid_until.is_none()).count(), 1);

    let purchases = installments::get_all(&target).unwrap();
    assert_eq!(purchases.len(), 1);
    let schedule = installments::schedule(&target, purchases[0].id).unwrap();
    assert_eq!(schedule.len(), 12);
    assert!(schedule[0].paid);

    let pots = savings::get_all(&target).unwrap();
    assert_eq!(pots.len(), 1);
    assert_eq!(savings::balance(&target, pots[0].id).unwrap(), dec("380"));
    assert_eq!(savings::movements(&target, pots[0].id).unwrap().len(), 2);
}

#[test]
fn import_replaces_prior_contents() {
    let mut source = setup();
    populate(&mut source);
    let doc = backup::export(&source).unwrap();

    let mut target = setup();
    users::set_user(&target, "Bob", "0000").unwrap();
    let food = categories::id_for_name(&target, CategoryFamily::Expense, "Food").unwrap();
    expenses::create(
        &target,
        &NewExpense {
            amount: dec("99"),
            description: "stale".into(),
            category_id: food,
            date: date("2020-01-01"),
            notes: None,
        },
    )
    .unwrap();

    backup::import(&mut target, &doc).unwrap();
    assert_eq!(users::current_user(&target).unwrap().unwrap().name, "Ada");
    let all = expenses::get_all(&target).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "lunch");
}

#[test]
fn document_missing_newer_families_still_imports() {
    let mut source = setup();
    populate(&mut source);
    let doc = backup::export(&source).unwrap();

    let mut val = serde_json::to_value(&doc).unwrap();
    let obj = val.as_object_mut().unwrap();
    for key in [
        "subscriptions",
        "subscriptionCategories",
        "installments",
        "installmentCategories",
        "savings",
    ] {
        obj.remove(key);
    }
    let older = backup::parse_document(&serde_json::to_string(&val).unwrap()).unwrap();
    assert!(older.subscriptions.is_empty());

    let mut target = setup();
    backup::import(&mut target, &older).unwrap();
    assert_eq!(expenses::get_all(&target).unwrap().len(), 1);
    assert!(subscriptions::get_all(&target).unwrap().is_empty());
    assert!(savings::get_all(&target).unwrap().is_empty());
}

#[test]
fn invalid_document_leaves_existing_data_untouched() {
    let mut source = setup();
    populate(&mut source);
    let mut doc = backup::export(&source).unwrap();
    doc.user.name = "".into();

    let mut target = setup();
    users::set_user(&target, "Bob", "0000").unwrap();
    let err = backup::import(&mut target, &doc).unwrap_err();
    assert!(matches!(err, StoreError::BackupFormat(_)));
    // validation failed before the clear, so nothing was lost
    assert_eq!(users::current_user(&target).unwrap().unwrap().name, "Bob");
}

#[test]
fn mid_insert_failure_rolls_back_to_prior_data() {
    let mut source = setup();
    populate(&mut source);
    let mut doc = backup::export(&source).unwrap();
    // a duplicated expense id trips the primary key partway through re-insert
    let mut dup = doc.expenses[0].clone();
    dup.description = "duplicate".into();
    doc.expenses.push(dup);

    let mut target = setup();
    users::set_user(&target, "Bob", "0000").unwrap();
    let categories_before = categories::get_all(&target, CategoryFamily::Expense)
        .unwrap()
        .len();

    let err = backup::import(&mut target, &doc).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));

    // the transaction rolled back: the clear and the partial re-insert are
    // both gone
    assert_eq!(users::current_user(&target).unwrap().unwrap().name, "Bob");
    assert_eq!(
        categories::get_all(&target, CategoryFamily::Expense)
            .unwrap()
            .len(),
        categories_before
    );
    assert!(expenses::get_all(&target).unwrap().is_empty());
}

#[test]
fn malformed_json_is_a_format_error() {
    let err = backup::parse_document("{\"version\":").unwrap_err();
    assert!(matches!(err, StoreError::BackupFormat(_)));
}

#[test]
fn cli_export_import_round_trips_through_a_file() {
    let mut source = setup();
    populate(&mut source);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");
    let path = path.to_str().unwrap();

    let matches =
        cli::build_cli().get_matches_from(["outgo", "backup", "export", "--out", path]);
    let Some(("backup", m)) = matches.subcommand() else {
        panic!("no backup subcommand");
    };
    commands::backup::handle(&mut source, m).unwrap();

    let mut target = setup();
    let matches =
        cli::build_cli().get_matches_from(["outgo", "backup", "import", "--path", path]);
    let Some(("backup", m)) = matches.subcommand() else {
        panic!("no backup subcommand");
    };
    commands::backup::handle(&mut target, m).unwrap();

    assert_eq!(users::current_user(&target).unwrap().unwrap().name, "Ada");
    assert_eq!(expenses::get_all(&target).unwrap().len(), 1);
}
