// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use outgo::db;
use outgo::models::{CategoryFamily, NewSubscription, Periodicity, SubscriptionPatch};
use outgo::recurrence;
use outgo::store::{categories, subscriptions};
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

fn add_subscription(conn: &mut Connection, amount: &str, start: Option<&str>, today: &str) -> i64 {
    let streaming =
        categories::id_for_name(conn, CategoryFamily::Subscription, "Video Streaming").unwrap();
    subscriptions::create(
        conn,
        &NewSubscription {
            name: "Streamflix".into(),
            amount: dec(amount),
            category_id: streaming,
            periodicity: Periodicity::Monthly,
            start_date: start.map(date),
            notes: None,
        },
        date(today),
    )
    .unwrap()
    .id
}

#[test]
fn create_opens_one_history_entry_at_start_date() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", Some("2024-01-15"), "2024-03-01");
    let history = subscriptions::price_history(&conn, id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, dec("9.99"));
    assert_eq!(history[0].valid_from, date("2024-01-15"));
    assert_eq!(history[0].valid_until, None);
}

#[test]
fn create_without_start_date_opens_entry_today() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", None, "2024-03-01");
    let history = subscriptions::price_history(&conn, id).unwrap();
    assert_eq!(history[0].valid_from, date("2024-03-01"));
}

#[test]
fn price_change_closes_open_entry_and_opens_new_one() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", Some("2024-01-15"), "2024-03-01");
    subscriptions::update(
        &mut conn,
        id,
        &SubscriptionPatch {
            amount: Some(dec("12.99")),
            ..Default::default()
        },
        date("2024-06-10"),
    )
    .unwrap();

    let history = subscriptions::price_history(&conn, id).unwrap();
    assert_eq!(history.len(), 2);
    // newest first
    assert_eq!(history[0].amount, dec("12.99"));
    assert_eq!(history[0].valid_from, date("2024-06-10"));
    assert_eq!(history[0].valid_until, None);
    assert_eq!(history[1].valid_until, Some(date("2024-06-09")));

    // exactly one open-ended entry
    let open = history.iter().filter(|e| e.valid_until.is_none()).count();
    assert_eq!(open, 1);

    let sub = subscriptions::get_by_id(&conn, id).unwrap().unwrap();
    assert_eq!(sub.amount, dec("12.99"));
}

#[test]
fn same_day_second_change_rewrites_open_entry() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", Some("2024-01-15"), "2024-03-01");
    let today = date("2024-06-10");
    for amount in ["12.99", "14.99"] {
        subscriptions::update(
            &mut conn,
            id,
            &SubscriptionPatch {
                amount: Some(dec(amount)),
                ..Default::default()
            },
            today,
        )
        .unwrap();
    }
    let history = subscriptions::price_history(&conn, id).unwrap();
    // two entries, not three: the second same-day change amended in place
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].amount, dec("14.99"));
    assert_eq!(history[0].valid_from, today);
    assert!(history.iter().all(|e| e
        .valid_until
        .is_none_or(|until| e.valid_from <= until)));
}

#[test]
fn unchanged_amount_leaves_history_alone() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", Some("2024-01-15"), "2024-03-01");
    subscriptions::update(
        &mut conn,
        id,
        &SubscriptionPatch {
            name: Some("Streamflix Plus".into()),
            ..Default::default()
        },
        date("2024-06-10"),
    )
    .unwrap();
    assert_eq!(subscriptions::price_history(&conn, id).unwrap().len(), 1);
}

#[test]
fn clearing_start_date_restores_always_active() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", Some("2024-05-01"), "2024-03-01");
    let sub = subscriptions::update(
        &mut conn,
        id,
        &SubscriptionPatch {
            start_date: Some(None),
            ..Default::default()
        },
        date("2024-03-02"),
    )
    .unwrap();
    assert_eq!(sub.start_date, None);
    // with no start date the item counts in every period again
    assert!(recurrence::should_count(&sub, 2024, 1));
}

#[test]
fn clearing_notes_resets_to_none() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", None, "2024-03-01");
    let sub = subscriptions::update(
        &mut conn,
        id,
        &SubscriptionPatch {
            notes: Some(Some("shared with family".into())),
            ..Default::default()
        },
        date("2024-03-02"),
    )
    .unwrap();
    assert_eq!(sub.notes.as_deref(), Some("shared with family"));
    let sub = subscriptions::update(
        &mut conn,
        id,
        &SubscriptionPatch {
            notes: Some(None),
            ..Default::default()
        },
        date("2024-03-03"),
    )
    .unwrap();
    assert_eq!(sub.notes, None);
}

#[test]
fn delete_cascades_to_history() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", Some("2024-01-15"), "2024-03-01");
    subscriptions::delete(&conn, id).unwrap();
    let orphans: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM subscription_price_history WHERE subscription_id=?1",
            [id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn toggle_flips_active_flag() {
    let mut conn = setup();
    let id = add_subscription(&mut conn, "9.99", None, "2024-03-01");
    let sub = subscriptions::toggle_active(&mut conn, id, date("2024-03-02")).unwrap();
    assert!(!sub.active);
    assert!(subscriptions::active(&conn).unwrap().is_empty());
    let sub = subscriptions::toggle_active(&mut conn, id, date("2024-03-03")).unwrap();
    assert!(sub.active);
}
