// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Portable full-data-set snapshot. Every entity family is exported with its
//! owned children nested under the parent, and import replaces everything
//! inside one transaction: a failed import leaves the prior data set intact.

use crate::db;
use crate::error::{Result, StoreError};
use crate::models::{
    Category, CategoryFamily, Expense, InstallmentPurchase, Movement, Payment, PriceHistoryEntry,
    Saving, Subscription, User,
};
use crate::store;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

pub const BACKUP_VERSION: &str = "3.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(flatten)]
    pub subscription: Subscription,
    #[serde(default)]
    pub price_history: Vec<PriceHistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentRecord {
    #[serde(flatten)]
    pub installment: InstallmentPurchase,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavingRecord {
    #[serde(flatten)]
    pub saving: Saving,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

/// Wire shape of a backup file. Families added after version 2.0 default to
/// empty so older documents still import.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub user: User,
    pub expenses: Vec<Expense>,
    pub expense_categories: Vec<Category>,
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionRecord>,
    #[serde(default)]
    pub subscription_categories: Vec<Category>,
    #[serde(default)]
    pub installments: Vec<InstallmentRecord>,
    #[serde(default)]
    pub installment_categories: Vec<Category>,
    #[serde(default)]
    pub savings: Vec<SavingRecord>,
}

/// Parse a backup file's contents. Malformed or field-missing documents are
/// a BackupFormat failure; nothing is touched yet at this point.
pub fn parse_document(json: &str) -> Result<BackupDocument> {
    serde_json::from_str(json).map_err(|e| StoreError::BackupFormat(e.to_string()))
}

pub fn export(conn: &Connection) -> Result<BackupDocument> {
    let user = store::users::current_user(conn)?
        .ok_or_else(|| StoreError::validation("no user profile set; run 'outgo user set' first"))?;

    let mut subscriptions = Vec::new();
    for subscription in store::subscriptions::get_all(conn)? {
        let price_history = store::subscriptions::price_history(conn, subscription.id)?;
        subscriptions.push(SubscriptionRecord {
            subscription,
            price_history,
        });
    }

    let mut installments = Vec::new();
    for installment in store::installments::get_all(conn)? {
        let payments = store::installments::schedule(conn, installment.id)?;
        installments.push(InstallmentRecord {
            installment,
            payments,
        });
    }

    let mut savings = Vec::new();
    for saving in store::savings::get_all(conn)? {
        let movements = store::savings::movements(conn, saving.id)?;
        savings.push(SavingRecord { saving, movements });
    }

    Ok(BackupDocument {
        version: BACKUP_VERSION.to_string(),
        export_date: Utc::now(),
        user,
        expenses: store::expenses::get_all(conn)?,
        expense_categories: store::categories::get_all(conn, CategoryFamily::Expense)?,
        subscriptions,
        subscription_categories: store::categories::get_all(conn, CategoryFamily::Subscription)?,
        installments,
        installment_categories: store::categories::get_all(conn, CategoryFamily::Installment)?,
        savings,
    })
}

fn validate(doc: &BackupDocument) -> Result<()> {
    if doc.version.trim().is_empty() {
        return Err(StoreError::BackupFormat("missing version tag".into()));
    }
    if doc.user.name.trim().is_empty() {
        return Err(StoreError::BackupFormat("missing user record".into()));
    }
    Ok(())
}

/// Replace the entire local data set with the document's contents. The
/// document is validated before the destructive clear, and the clear plus
/// every insert run in a single transaction. Ids are preserved so child
/// references survive unchanged.
pub fn import(conn: &mut Connection, doc: &BackupDocument) -> Result<()> {
    validate(doc)?;

    let tx = conn.transaction()?;
    db::clear_all_data(&tx)?;

    store::users::replace_user(&tx, &doc.user)?;

    for category in doc
        .expense_categories
        .iter()
        .chain(&doc.subscription_categories)
        .chain(&doc.installment_categories)
    {
        tx.execute(
            "INSERT INTO categories(id, name, icon, color, active, family)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                category.id,
                category.name,
                category.icon,
                category.color,
                category.active,
                category.family,
            ],
        )?;
    }

    for e in &doc.expenses {
        tx.execute(
            "INSERT INTO expenses(id, amount, description, category_id, date, notes, created_at,
             updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                e.id,
                e.amount.to_string(),
                e.description,
                e.category_id,
                e.date,
                e.notes,
                e.created_at,
                e.updated_at,
            ],
        )?;
    }

    for record in &doc.subscriptions {
        let s = &record.subscription;
        tx.execute(
            "INSERT INTO subscriptions(id, name, amount, category_id, periodicity, start_date,
             active, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                s.id,
                s.name,
                s.amount.to_string(),
                s.category_id,
                s.periodicity,
                s.start_date,
                s.active,
                s.notes,
                s.created_at,
                s.updated_at,
            ],
        )?;
        for entry in &record.price_history {
            tx.execute(
                "INSERT INTO subscription_price_history(id, subscription_id, amount, valid_from,
                 valid_until) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.id,
                    s.id,
                    entry.amount.to_string(),
                    entry.valid_from,
                    entry.valid_until,
                ],
            )?;
        }
    }

    for record in &doc.installments {
        let i = &record.installment;
        tx.execute(
            "INSERT INTO installments(id, name, total_amount, total_installments,
             installment_amount, category_id, periodicity, start_date, active, notes, created_at,
             updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                i.id,
                i.name,
                i.total_amount.to_string(),
                i.total_installments,
                i.installment_amount.to_string(),
                i.category_id,
                i.periodicity,
                i.start_date,
                i.active,
                i.notes,
                i.created_at,
                i.updated_at,
            ],
        )?;
        for p in &record.payments {
            tx.execute(
                "INSERT INTO installment_payments(id, installment_id, seq, amount, due_date, paid,
                 paid_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    p.id,
                    i.id,
                    p.seq,
                    p.amount.to_string(),
                    p.due_date,
                    p.paid,
                    p.paid_date,
                ],
            )?;
        }
    }

    for record in &doc.savings {
        let s = &record.saving;
        tx.execute(
            "INSERT INTO savings(id, name, kind, active, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![s.id, s.name, s.kind, s.active, s.notes, s.created_at, s.updated_at],
        )?;
        for m in &record.movements {
            tx.execute(
                "INSERT INTO savings_movements(id, saving_id, kind, amount, description,
                 created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![m.id, s.id, m.kind, m.amount.to_string(), m.description, m.created_at],
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}
