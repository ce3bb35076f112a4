// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::{
    InstallmentPatch, InstallmentPeriodicity, InstallmentPurchase, NewInstallment, Payment,
};
use crate::store::decimal_column;
use chrono::{Days, Months, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

const COLUMNS: &str = "id, name, total_amount, total_installments, installment_amount, \
                       category_id, periodicity, start_date, active, notes, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "id, installment_id, seq, amount, due_date, paid, paid_date";

fn row_to_installment(r: &Row) -> rusqlite::Result<InstallmentPurchase> {
    Ok(InstallmentPurchase {
        id: r.get(0)?,
        name: r.get(1)?,
        total_amount: decimal_column(2, r.get(2)?)?,
        total_installments: r.get(3)?,
        installment_amount: decimal_column(4, r.get(4)?)?,
        category_id: r.get(5)?,
        periodicity: r.get(6)?,
        start_date: r.get(7)?,
        active: r.get(8)?,
        notes: r.get(9)?,
        created_at: r.get(10)?,
        updated_at: r.get(11)?,
    })
}

fn row_to_payment(r: &Row) -> rusqlite::Result<Payment> {
    Ok(Payment {
        id: r.get(0)?,
        installment_id: r.get(1)?,
        seq: r.get(2)?,
        amount: decimal_column(3, r.get(3)?)?,
        due_date: r.get(4)?,
        paid: r.get(5)?,
        paid_date: r.get(6)?,
    })
}

/// Due date of the 1-based `seq`-th payment. Monthly steps are anchored to
/// the start date (chrono clamps short months); biweekly steps are 14 days.
pub fn due_date_for(
    start: NaiveDate,
    periodicity: InstallmentPeriodicity,
    seq: u32,
) -> Result<NaiveDate> {
    let date = match periodicity {
        InstallmentPeriodicity::Monthly => start.checked_add_months(Months::new(seq - 1)),
        InstallmentPeriodicity::Biweekly => {
            start.checked_add_days(Days::new(14 * u64::from(seq - 1)))
        }
    };
    date.ok_or_else(|| StoreError::validation(format!("due date out of range for payment {seq}")))
}

/// Creates the purchase and generates its full payment schedule, one row
/// per installment, in one transaction.
pub fn create(conn: &mut Connection, new: &NewInstallment) -> Result<InstallmentPurchase> {
    if new.name.trim().is_empty() {
        return Err(StoreError::validation("installment name must not be empty"));
    }
    if new.total_installments == 0 {
        return Err(StoreError::validation("installment count must be at least 1"));
    }
    if new.total_amount < Decimal::ZERO || new.installment_amount < Decimal::ZERO {
        return Err(StoreError::validation(
            "installment amounts must not be negative",
        ));
    }

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO installments(name, total_amount, total_installments, installment_amount,
         category_id, periodicity, start_date, active, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)",
        params![
            new.name.trim(),
            new.total_amount.to_string(),
            new.total_installments,
            new.installment_amount.to_string(),
            new.category_id,
            new.periodicity,
            new.start_date,
            new.notes,
            Utc::now(),
        ],
    )?;
    let id = tx.last_insert_rowid();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO installment_payments(installment_id, seq, amount, due_date, paid)
             VALUES (?1, ?2, ?3, ?4, 0)",
        )?;
        for seq in 1..=new.total_installments {
            let due = due_date_for(new.start_date, new.periodicity, seq)?;
            stmt.execute(params![id, seq, new.installment_amount.to_string(), due])?;
        }
    }
    tx.commit()?;
    require(conn, id)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<InstallmentPurchase>> {
    let found = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM installments WHERE id=?1"),
            params![id],
            row_to_installment,
        )
        .optional()?;
    Ok(found)
}

fn require(conn: &Connection, id: i64) -> Result<InstallmentPurchase> {
    get_by_id(conn, id)?.ok_or_else(|| StoreError::not_found("installment", id))
}

pub fn update(conn: &Connection, id: i64, patch: &InstallmentPatch) -> Result<InstallmentPurchase> {
    let mut installment = require(conn, id)?;
    patch.apply_to(&mut installment);
    if installment.name.trim().is_empty() {
        return Err(StoreError::validation("installment name must not be empty"));
    }
    conn.execute(
        "UPDATE installments SET name=?1, category_id=?2, active=?3, notes=?4, updated_at=?5
         WHERE id=?6",
        params![
            installment.name,
            installment.category_id,
            installment.active,
            installment.notes,
            Utc::now(),
            id,
        ],
    )?;
    require(conn, id)
}

pub fn toggle_active(conn: &Connection, id: i64) -> Result<InstallmentPurchase> {
    let installment = require(conn, id)?;
    update(
        conn,
        id,
        &InstallmentPatch {
            active: Some(!installment.active),
            ..Default::default()
        },
    )
}

/// The generated schedule goes with the purchase (FK cascade). Idempotent.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM installments WHERE id=?1", params![id])?;
    Ok(())
}

pub fn get_all(conn: &Connection) -> Result<Vec<InstallmentPurchase>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM installments ORDER BY start_date DESC, id DESC"),
    )
}

pub fn active(conn: &Connection) -> Result<Vec<InstallmentPurchase>> {
    query_vec(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM installments WHERE active=1 ORDER BY start_date DESC, id DESC"
        ),
    )
}

pub fn schedule(conn: &Connection, installment_id: i64) -> Result<Vec<Payment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM installment_payments WHERE installment_id=?1 ORDER BY seq"
    ))?;
    let rows = stmt.query_map(params![installment_id], row_to_payment)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn get_payment(conn: &Connection, payment_id: i64) -> Result<Option<Payment>> {
    let found = conn
        .query_row(
            &format!("SELECT {PAYMENT_COLUMNS} FROM installment_payments WHERE id=?1"),
            params![payment_id],
            row_to_payment,
        )
        .optional()?;
    Ok(found)
}

/// Mark a payment paid or unpaid; the paid date follows the flag.
pub fn set_payment_paid(
    conn: &Connection,
    payment_id: i64,
    paid: bool,
    today: NaiveDate,
) -> Result<Payment> {
    let paid_date = paid.then_some(today);
    let changed = conn.execute(
        "UPDATE installment_payments SET paid=?1, paid_date=?2 WHERE id=?3",
        params![paid, paid_date, payment_id],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("payment", payment_id));
    }
    get_payment(conn, payment_id)?.ok_or_else(|| StoreError::not_found("payment", payment_id))
}

/// Unpaid payments across every active purchase, soonest due first.
pub fn unpaid_for_active(conn: &Connection) -> Result<Vec<Payment>> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.installment_id, p.seq, p.amount, p.due_date, p.paid, p.paid_date
         FROM installment_payments p
         JOIN installments i ON p.installment_id = i.id
         WHERE p.paid=0 AND i.active=1
         ORDER BY p.due_date, p.seq",
    )?;
    let rows = stmt.query_map([], row_to_payment)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn query_vec(conn: &Connection, sql: &str) -> Result<Vec<InstallmentPurchase>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], row_to_installment)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
