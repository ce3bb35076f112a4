// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Subscriptions with more than one open price entry
    let mut stmt = conn.prepare(
        "SELECT subscription_id, COUNT(*) FROM subscription_price_history
         WHERE valid_until IS NULL GROUP BY subscription_id HAVING COUNT(*) > 1",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let n: i64 = r.get(1)?;
        rows.push(vec![
            "multiple_open_prices".into(),
            format!("subscription {} has {} open entries", id, n),
        ]);
    }

    // 2) Schedules whose payment count disagrees with the purchase
    let mut stmt2 = conn.prepare(
        "SELECT i.id, i.total_installments, COUNT(p.id)
         FROM installments i LEFT JOIN installment_payments p ON p.installment_id = i.id
         GROUP BY i.id HAVING COUNT(p.id) != i.total_installments",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let expected: u32 = r.get(1)?;
        let actual: i64 = r.get(2)?;
        rows.push(vec![
            "schedule_count_mismatch".into(),
            format!("installment {} expects {} payments, has {}", id, expected, actual),
        ]);
    }

    // 3) Category references pointing outside the owning family
    for (table, family) in [
        ("expenses", "expense"),
        ("subscriptions", "subscription"),
        ("installments", "installment"),
    ] {
        let mut st = conn.prepare(&format!(
            "SELECT t.id FROM {table} t JOIN categories c ON t.category_id = c.id
             WHERE c.family != ?1"
        ))?;
        let mut c = st.query([family])?;
        while let Some(r) = c.next()? {
            let id: i64 = r.get(0)?;
            rows.push(vec![
                "category_family_mismatch".into(),
                format!("{} {} references a non-{} category", table, id, family),
            ]);
        }
    }

    // 4) Savings pots whose ledger nets negative
    for saving in store::savings::get_all(conn)? {
        let balance = store::savings::balance(conn, saving.id)?;
        if balance < Decimal::ZERO {
            rows.push(vec![
                "negative_balance".into(),
                format!("saving {} ('{}') nets {}", saving.id, saving.name, balance),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
