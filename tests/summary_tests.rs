// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use outgo::db;
use outgo::models::{
    CategoryFamily, InstallmentPeriodicity, NewExpense, NewInstallment, NewSaving,
    NewSubscription, Periodicity, SavingKind,
};
use outgo::store::{categories, expenses, installments, savings, subscriptions};
use outgo::summary::{self, UNCATEGORIZED};
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

fn add_expense(conn: &Connection, amount: &str, on: &str, category: &str) {
    let category_id = categories::id_for_name(conn, CategoryFamily::Expense, category).unwrap();
    expenses::create(
        conn,
        &NewExpense {
            amount: dec(amount),
            description: "expense".into(),
            category_id,
            date: date(on),
            notes: None,
        },
    )
    .unwrap();
}

fn add_subscription(conn: &mut Connection, amount: &str, periodicity: Periodicity, start: &str) {
    let category_id =
        categories::id_for_name(conn, CategoryFamily::Subscription, "Video Streaming").unwrap();
    subscriptions::create(
        conn,
        &NewSubscription {
            name: "Streamflix".into(),
            amount: dec(amount),
            category_id,
            periodicity,
            start_date: Some(date(start)),
            notes: None,
        },
        date(start),
    )
    .unwrap();
}

#[test]
fn weekly_totals_one_off_expenses_only() {
    let mut conn = setup();
    add_expense(&conn, "50", "2024-03-05", "Food");
    add_expense(&conn, "25", "2024-03-06", "Transport");
    add_expense(&conn, "99", "2024-03-20", "Food");
    add_subscription(&mut conn, "200", Periodicity::Monthly, "2024-01-01");

    let week = summary::weekly_summary(&conn, date("2024-03-04"), date("2024-03-10")).unwrap();
    assert_eq!(week.total, dec("75"));
    assert_eq!(week.count, 2);
}

#[test]
fn monthly_mixes_expenses_and_recurring_costs() {
    let mut conn = setup();
    add_expense(&conn, "500", "2024-03-10", "Food");
    add_subscription(&mut conn, "200", Periodicity::Monthly, "2024-01-01");

    let month = summary::monthly_summary(&conn, 2024, 3).unwrap();
    assert_eq!(month.expenses_total, dec("500"));
    assert_eq!(month.subscriptions_total, dec("200"));
    assert_eq!(month.total, dec("700"));
    assert_eq!(month.count, 1);
    assert_eq!(month.by_category.get("Food"), Some(&dec("500")));
    assert_eq!(month.by_category.get("Video Streaming"), Some(&dec("200")));
}

#[test]
fn monthly_skips_subscriptions_not_yet_started() {
    let mut conn = setup();
    add_subscription(&mut conn, "200", Periodicity::Monthly, "2024-05-01");
    let month = summary::monthly_summary(&conn, 2024, 3).unwrap();
    assert_eq!(month.subscriptions_total, Decimal::ZERO);
    assert!(month.by_category.is_empty());
}

#[test]
fn deactivated_category_falls_back_to_uncategorized() {
    let conn = setup();
    add_expense(&conn, "40", "2024-03-10", "Food");
    let food = categories::id_for_name(&conn, CategoryFamily::Expense, "Food").unwrap();
    categories::toggle_active(&conn, food).unwrap();

    let month = summary::monthly_summary(&conn, 2024, 3).unwrap();
    assert_eq!(month.by_category.get(UNCATEGORIZED), Some(&dec("40")));
    assert_eq!(month.by_category.get("Food"), None);
}

#[test]
fn yearly_total_is_clipped_but_buckets_are_not() {
    let mut conn = setup();
    add_expense(&conn, "100", "2024-02-10", "Food");
    add_subscription(&mut conn, "10", Periodicity::Monthly, "2024-01-01");

    // evaluated mid-August: 8 elapsed months of subscription cost
    let year = summary::yearly_summary(&conn, 2024, date("2024-08-15")).unwrap();
    assert_eq!(year.expenses_total, dec("100"));
    assert_eq!(year.subscriptions_total, dec("80"));
    assert_eq!(year.total, dec("180"));
    // December still shows the recurring cost for charting
    assert_eq!(year.by_month.get(&12), Some(&dec("10")));
    assert_eq!(year.by_month.get(&2), Some(&dec("110")));
}

#[test]
fn subscriptions_rollup_counts_active_only() {
    let mut conn = setup();
    add_subscription(&mut conn, "10", Periodicity::Monthly, "2024-01-01");
    let category_id =
        categories::id_for_name(&conn, CategoryFamily::Subscription, "Education").unwrap();
    let dormant = subscriptions::create(
        &mut conn,
        &NewSubscription {
            name: "Courses".into(),
            amount: dec("99"),
            category_id,
            periodicity: Periodicity::Monthly,
            start_date: Some(date("2024-01-01")),
            notes: None,
        },
        date("2024-01-01"),
    )
    .unwrap();
    subscriptions::toggle_active(&mut conn, dormant.id, date("2024-02-01")).unwrap();

    let rollup = summary::subscriptions_summary(&conn, date("2024-08-15")).unwrap();
    assert_eq!(rollup.count, 1);
    assert_eq!(rollup.monthly_total, dec("10"));
    assert_eq!(rollup.yearly_total, dec("80"));
}

#[test]
fn installments_rollup_tracks_unpaid_and_due_this_month() {
    let mut conn = setup();
    let category_id =
        categories::id_for_name(&conn, CategoryFamily::Installment, "Electronics").unwrap();
    let purchase = installments::create(
        &mut conn,
        &NewInstallment {
            name: "Laptop".into(),
            total_amount: dec("300"),
            total_installments: 3,
            installment_amount: dec("100"),
            category_id,
            periodicity: InstallmentPeriodicity::Monthly,
            start_date: date("2024-03-10"),
            notes: None,
        },
    )
    .unwrap();
    let first = installments::schedule(&conn, purchase.id).unwrap()[0].clone();
    installments::set_payment_paid(&conn, first.id, true, date("2024-03-12")).unwrap();

    let rollup = summary::installments_summary(&conn, date("2024-04-15")).unwrap();
    assert_eq!(rollup.unpaid_count, 2);
    assert_eq!(rollup.due_this_month, dec("100"));
    assert_eq!(rollup.remaining_total, dec("200"));
}

#[test]
fn savings_rollup_groups_by_kind() {
    let conn = setup();
    let bank = savings::create(
        &conn,
        &NewSaving {
            name: "Checking buffer".into(),
            kind: SavingKind::Bank,
            notes: None,
        },
    )
    .unwrap();
    let cash = savings::create(
        &conn,
        &NewSaving {
            name: "Jar".into(),
            kind: SavingKind::Cash,
            notes: None,
        },
    )
    .unwrap();
    savings::deposit(&conn, bank.id, dec("100"), None).unwrap();
    savings::deposit(&conn, cash.id, dec("40"), None).unwrap();
    savings::withdraw(&conn, cash.id, dec("15"), None).unwrap();

    let rollup = summary::savings_summary(&conn).unwrap();
    assert_eq!(rollup.total, dec("125"));
    assert_eq!(rollup.active_count, 2);
    assert_eq!(rollup.by_kind.get("bank"), Some(&dec("100")));
    assert_eq!(rollup.by_kind.get("cash"), Some(&dec("25")));
}
