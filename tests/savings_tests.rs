// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use outgo::db;
use outgo::error::StoreError;
use outgo::models::{MovementKind, NewSaving, SavingKind};
use outgo::store::savings;
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

fn add_pot(conn: &Connection, kind: SavingKind) -> i64 {
    savings::create(
        conn,
        &NewSaving {
            name: "Emergency fund".into(),
            kind,
            notes: None,
        },
    )
    .unwrap()
    .id
}

#[test]
fn new_pot_starts_at_zero() {
    let conn = setup();
    let id = add_pot(&conn, SavingKind::Bank);
    assert_eq!(savings::balance(&conn, id).unwrap(), Decimal::ZERO);
}

#[test]
fn balance_is_deposits_minus_withdrawals() {
    let conn = setup();
    let id = add_pot(&conn, SavingKind::Bank);
    savings::deposit(&conn, id, dec("100"), Some("initial")).unwrap();
    savings::deposit(&conn, id, dec("50.25"), None).unwrap();
    savings::withdraw(&conn, id, dec("30"), Some("car repair")).unwrap();
    assert_eq!(savings::balance(&conn, id).unwrap(), dec("120.25"));
}

#[test]
fn non_positive_movement_rejected() {
    let conn = setup();
    let id = add_pot(&conn, SavingKind::Cash);
    for amount in ["0", "-5"] {
        let err = savings::deposit(&conn, id, dec(amount), None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}

#[test]
fn movement_on_missing_pot_is_not_found() {
    let conn = setup();
    let err = savings::deposit(&conn, 999, dec("10"), None).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "saving", .. }));
}

#[test]
fn ledger_lists_newest_first() {
    let conn = setup();
    let id = add_pot(&conn, SavingKind::Investment);
    savings::deposit(&conn, id, dec("10"), Some("first")).unwrap();
    savings::withdraw(&conn, id, dec("5"), Some("second")).unwrap();
    let ledger = savings::movements(&conn, id).unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].kind, MovementKind::Withdrawal);
    assert_eq!(ledger[1].kind, MovementKind::Deposit);
}

#[test]
fn delete_cascades_to_ledger() {
    let conn = setup();
    let id = add_pot(&conn, SavingKind::Other);
    savings::deposit(&conn, id, dec("10"), None).unwrap();
    savings::delete(&conn, id).unwrap();
    let orphans: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM savings_movements WHERE saving_id=?1",
            [id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}
