// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::{Movement, MovementKind, NewSaving, Saving, SavingPatch};
use crate::store::decimal_column;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

const COLUMNS: &str = "id, name, kind, active, notes, created_at, updated_at";

fn row_to_saving(r: &Row) -> rusqlite::Result<Saving> {
    Ok(Saving {
        id: r.get(0)?,
        name: r.get(1)?,
        kind: r.get(2)?,
        active: r.get(3)?,
        notes: r.get(4)?,
        created_at: r.get(5)?,
        updated_at: r.get(6)?,
    })
}

fn row_to_movement(r: &Row) -> rusqlite::Result<Movement> {
    Ok(Movement {
        id: r.get(0)?,
        saving_id: r.get(1)?,
        kind: r.get(2)?,
        amount: decimal_column(3, r.get(3)?)?,
        description: r.get(4)?,
        created_at: r.get(5)?,
    })
}

pub fn create(conn: &Connection, new: &NewSaving) -> Result<Saving> {
    if new.name.trim().is_empty() {
        return Err(StoreError::validation("saving name must not be empty"));
    }
    conn.execute(
        "INSERT INTO savings(name, kind, active, notes, created_at) VALUES (?1, ?2, 1, ?3, ?4)",
        params![new.name.trim(), new.kind, new.notes, Utc::now()],
    )?;
    require(conn, conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Saving>> {
    let found = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM savings WHERE id=?1"),
            params![id],
            row_to_saving,
        )
        .optional()?;
    Ok(found)
}

fn require(conn: &Connection, id: i64) -> Result<Saving> {
    get_by_id(conn, id)?.ok_or_else(|| StoreError::not_found("saving", id))
}

pub fn update(conn: &Connection, id: i64, patch: &SavingPatch) -> Result<Saving> {
    let mut saving = require(conn, id)?;
    patch.apply_to(&mut saving);
    if saving.name.trim().is_empty() {
        return Err(StoreError::validation("saving name must not be empty"));
    }
    conn.execute(
        "UPDATE savings SET name=?1, kind=?2, active=?3, notes=?4, updated_at=?5 WHERE id=?6",
        params![saving.name, saving.kind, saving.active, saving.notes, Utc::now(), id],
    )?;
    require(conn, id)
}

pub fn toggle_active(conn: &Connection, id: i64) -> Result<Saving> {
    let saving = require(conn, id)?;
    update(
        conn,
        id,
        &SavingPatch {
            active: Some(!saving.active),
            ..Default::default()
        },
    )
}

/// The movement ledger goes with the pot (FK cascade). Idempotent.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM savings WHERE id=?1", params![id])?;
    Ok(())
}

pub fn get_all(conn: &Connection) -> Result<Vec<Saving>> {
    query_vec(conn, &format!("SELECT {COLUMNS} FROM savings ORDER BY name, id"))
}

pub fn active(conn: &Connection) -> Result<Vec<Saving>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM savings WHERE active=1 ORDER BY name, id"),
    )
}

pub fn deposit(
    conn: &Connection,
    id: i64,
    amount: Decimal,
    description: Option<&str>,
) -> Result<Movement> {
    append_movement(conn, id, MovementKind::Deposit, amount, description)
}

pub fn withdraw(
    conn: &Connection,
    id: i64,
    amount: Decimal,
    description: Option<&str>,
) -> Result<Movement> {
    append_movement(conn, id, MovementKind::Withdrawal, amount, description)
}

fn append_movement(
    conn: &Connection,
    saving_id: i64,
    kind: MovementKind,
    amount: Decimal,
    description: Option<&str>,
) -> Result<Movement> {
    if amount <= Decimal::ZERO {
        return Err(StoreError::validation("movement amount must be positive"));
    }
    require(conn, saving_id)?;
    conn.execute(
        "INSERT INTO savings_movements(saving_id, kind, amount, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![saving_id, kind, amount.to_string(), description, Utc::now()],
    )?;
    let movement_id = conn.last_insert_rowid();
    conn.query_row(
        "SELECT id, saving_id, kind, amount, description, created_at
         FROM savings_movements WHERE id=?1",
        params![movement_id],
        row_to_movement,
    )
    .map_err(StoreError::from)
}

/// Balance is the ledger projection: deposits minus withdrawals since
/// creation. There is no stored balance to drift from it.
pub fn balance(conn: &Connection, id: i64) -> Result<Decimal> {
    require(conn, id)?;
    let mut stmt =
        conn.prepare("SELECT kind, amount FROM savings_movements WHERE saving_id=?1")?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((r.get::<_, MovementKind>(0)?, decimal_column(1, r.get(1)?)?))
    })?;
    let mut total = Decimal::ZERO;
    for row in rows {
        let (kind, amount) = row?;
        match kind {
            MovementKind::Deposit => total += amount,
            MovementKind::Withdrawal => total -= amount,
        }
    }
    Ok(total)
}

/// Newest movement first.
pub fn movements(conn: &Connection, saving_id: i64) -> Result<Vec<Movement>> {
    require(conn, saving_id)?;
    let mut stmt = conn.prepare(
        "SELECT id, saving_id, kind, amount, description, created_at
         FROM savings_movements WHERE saving_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![saving_id], row_to_movement)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn query_vec(conn: &Connection, sql: &str) -> Result<Vec<Saving>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], row_to_saving)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
