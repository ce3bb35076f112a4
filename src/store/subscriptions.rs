// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::{NewSubscription, PriceHistoryEntry, Subscription, SubscriptionPatch};
use crate::store::decimal_column;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

const COLUMNS: &str = "id, name, amount, category_id, periodicity, start_date, active, notes, \
                       created_at, updated_at";

fn row_to_subscription(r: &Row) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: r.get(0)?,
        name: r.get(1)?,
        amount: decimal_column(2, r.get(2)?)?,
        category_id: r.get(3)?,
        periodicity: r.get(4)?,
        start_date: r.get(5)?,
        active: r.get(6)?,
        notes: r.get(7)?,
        created_at: r.get(8)?,
        updated_at: r.get(9)?,
    })
}

fn row_to_history(r: &Row) -> rusqlite::Result<PriceHistoryEntry> {
    Ok(PriceHistoryEntry {
        id: r.get(0)?,
        subscription_id: r.get(1)?,
        amount: decimal_column(2, r.get(2)?)?,
        valid_from: r.get(3)?,
        valid_until: r.get(4)?,
    })
}

fn validate(name: &str, amount: Decimal) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::validation("subscription name must not be empty"));
    }
    if amount < Decimal::ZERO {
        return Err(StoreError::validation(
            "subscription amount must not be negative",
        ));
    }
    Ok(())
}

/// Creates the subscription together with its single open-ended price
/// history entry, in one transaction.
pub fn create(conn: &mut Connection, new: &NewSubscription, today: NaiveDate) -> Result<Subscription> {
    validate(&new.name, new.amount)?;
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO subscriptions(name, amount, category_id, periodicity, start_date, active,
         notes, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
        params![
            new.name.trim(),
            new.amount.to_string(),
            new.category_id,
            new.periodicity,
            new.start_date,
            new.notes,
            Utc::now(),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.execute(
        "INSERT INTO subscription_price_history(subscription_id, amount, valid_from, valid_until)
         VALUES (?1, ?2, ?3, NULL)",
        params![id, new.amount.to_string(), new.start_date.unwrap_or(today)],
    )?;
    tx.commit()?;
    require(conn, id)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Subscription>> {
    let found = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM subscriptions WHERE id=?1"),
            params![id],
            row_to_subscription,
        )
        .optional()?;
    Ok(found)
}

fn require(conn: &Connection, id: i64) -> Result<Subscription> {
    get_by_id(conn, id)?.ok_or_else(|| StoreError::not_found("subscription", id))
}

/// Update mutable fields. A price change closes the open history entry the
/// day before `today` and opens a new one; the entity's `amount` stays the
/// current price. A second change on the same day rewrites the open entry
/// in place so validity ranges cannot invert.
pub fn update(
    conn: &mut Connection,
    id: i64,
    patch: &SubscriptionPatch,
    today: NaiveDate,
) -> Result<Subscription> {
    let existing = require(conn, id)?;
    let mut merged = existing.clone();
    patch.apply_to(&mut merged);
    validate(&merged.name, merged.amount)?;

    let tx = conn.transaction()?;
    if merged.amount != existing.amount {
        roll_price_history(&tx, id, merged.amount, today)?;
    }
    tx.execute(
        "UPDATE subscriptions SET name=?1, amount=?2, category_id=?3, periodicity=?4,
         start_date=?5, active=?6, notes=?7, updated_at=?8 WHERE id=?9",
        params![
            merged.name,
            merged.amount.to_string(),
            merged.category_id,
            merged.periodicity,
            merged.start_date,
            merged.active,
            merged.notes,
            Utc::now(),
            id,
        ],
    )?;
    tx.commit()?;
    require(conn, id)
}

fn roll_price_history(
    conn: &Connection,
    subscription_id: i64,
    new_amount: Decimal,
    today: NaiveDate,
) -> Result<()> {
    let open: Option<(i64, NaiveDate)> = conn
        .query_row(
            "SELECT id, valid_from FROM subscription_price_history
             WHERE subscription_id=?1 AND valid_until IS NULL",
            params![subscription_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;

    match open {
        Some((entry_id, valid_from)) if valid_from >= today => {
            conn.execute(
                "UPDATE subscription_price_history SET amount=?1 WHERE id=?2",
                params![new_amount.to_string(), entry_id],
            )?;
        }
        Some((entry_id, _)) => {
            let closed_on = today.pred_opt().unwrap_or(today);
            conn.execute(
                "UPDATE subscription_price_history SET valid_until=?1 WHERE id=?2",
                params![closed_on, entry_id],
            )?;
            conn.execute(
                "INSERT INTO subscription_price_history(subscription_id, amount, valid_from,
                 valid_until) VALUES (?1, ?2, ?3, NULL)",
                params![subscription_id, new_amount.to_string(), today],
            )?;
        }
        None => {
            conn.execute(
                "INSERT INTO subscription_price_history(subscription_id, amount, valid_from,
                 valid_until) VALUES (?1, ?2, ?3, NULL)",
                params![subscription_id, new_amount.to_string(), today],
            )?;
        }
    }
    Ok(())
}

pub fn toggle_active(conn: &mut Connection, id: i64, today: NaiveDate) -> Result<Subscription> {
    let subscription = require(conn, id)?;
    update(
        conn,
        id,
        &SubscriptionPatch {
            active: Some(!subscription.active),
            ..Default::default()
        },
        today,
    )
}

/// Price history rows go with the subscription (FK cascade). Idempotent.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM subscriptions WHERE id=?1", params![id])?;
    Ok(())
}

pub fn get_all(conn: &Connection) -> Result<Vec<Subscription>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM subscriptions ORDER BY name, id"),
    )
}

pub fn active(conn: &Connection) -> Result<Vec<Subscription>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM subscriptions WHERE active=1 ORDER BY name, id"),
    )
}

/// Newest price first.
pub fn price_history(conn: &Connection, subscription_id: i64) -> Result<Vec<PriceHistoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, subscription_id, amount, valid_from, valid_until
         FROM subscription_price_history WHERE subscription_id=?1
         ORDER BY valid_from DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![subscription_id], row_to_history)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn query_vec(conn: &Connection, sql: &str) -> Result<Vec<Subscription>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], row_to_subscription)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
