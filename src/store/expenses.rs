// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::{Expense, ExpensePatch, NewExpense};
use crate::store::decimal_column;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

const COLUMNS: &str = "id, amount, description, category_id, date, notes, created_at, updated_at";

fn row_to_expense(r: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: r.get(0)?,
        amount: decimal_column(1, r.get(1)?)?,
        description: r.get(2)?,
        category_id: r.get(3)?,
        date: r.get(4)?,
        notes: r.get(5)?,
        created_at: r.get(6)?,
        updated_at: r.get(7)?,
    })
}

fn validate(amount: Decimal, description: &str) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(StoreError::validation("expense amount must not be negative"));
    }
    if description.trim().is_empty() {
        return Err(StoreError::validation("expense description must not be empty"));
    }
    Ok(())
}

pub fn create(conn: &Connection, new: &NewExpense) -> Result<Expense> {
    validate(new.amount, &new.description)?;
    conn.execute(
        "INSERT INTO expenses(amount, description, category_id, date, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.amount.to_string(),
            new.description.trim(),
            new.category_id,
            new.date,
            new.notes,
            Utc::now(),
        ],
    )?;
    require(conn, conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let found = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM expenses WHERE id=?1"),
            params![id],
            row_to_expense,
        )
        .optional()?;
    Ok(found)
}

fn require(conn: &Connection, id: i64) -> Result<Expense> {
    get_by_id(conn, id)?.ok_or_else(|| StoreError::not_found("expense", id))
}

pub fn update(conn: &Connection, id: i64, patch: &ExpensePatch) -> Result<Expense> {
    let mut expense = require(conn, id)?;
    patch.apply_to(&mut expense);
    validate(expense.amount, &expense.description)?;
    conn.execute(
        "UPDATE expenses SET amount=?1, description=?2, category_id=?3, date=?4, notes=?5,
         updated_at=?6 WHERE id=?7",
        params![
            expense.amount.to_string(),
            expense.description,
            expense.category_id,
            expense.date,
            expense.notes,
            Utc::now(),
            id,
        ],
    )?;
    require(conn, id)
}

/// Idempotent: deleting an absent id is a no-op.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    Ok(())
}

pub fn get_all(conn: &Connection) -> Result<Vec<Expense>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM expenses ORDER BY date DESC, id DESC"),
        params![],
    )
}

pub fn by_month(conn: &Connection, year: i32, month: u32) -> Result<Vec<Expense>> {
    let key = format!("{:04}-{:02}", year, month);
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM expenses WHERE substr(date,1,7)=?1 ORDER BY date, id"),
        params![key],
    )
}

pub fn by_year(conn: &Connection, year: i32) -> Result<Vec<Expense>> {
    let key = format!("{:04}", year);
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM expenses WHERE substr(date,1,4)=?1 ORDER BY date, id"),
        params![key],
    )
}

/// Inclusive on both ends.
pub fn by_date_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM expenses WHERE date>=?1 AND date<=?2 ORDER BY date, id"),
        params![start, end],
    )
}

pub fn by_category(conn: &Connection, category_id: i64) -> Result<Vec<Expense>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM expenses WHERE category_id=?1 ORDER BY date DESC, id DESC"),
        params![category_id],
    )
}

pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<Expense>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM expenses ORDER BY date DESC, id DESC LIMIT ?1"),
        params![limit as i64],
    )
}

fn query_vec(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, row_to_expense)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
