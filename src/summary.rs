// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only period summaries over the store. One-off expenses and recurring
//! subscription costs share a category-keyed breakdown; installments and
//! savings have their own rollups. Nothing here mutates anything.

use crate::error::Result;
use crate::models::{Category, CategoryFamily, PriceHistoryEntry, Subscription};
use crate::recurrence::{cost_for_month, cost_for_year};
use crate::store;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Display fallback for missing or deactivated category references.
pub const UNCATEGORIZED: &str = "(uncategorized)";

#[derive(Debug, Serialize)]
pub struct WeeklySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
    pub expenses_total: Decimal,
    pub subscriptions_total: Decimal,
    pub count: usize,
    pub by_category: BTreeMap<String, Decimal>,
}

#[derive(Debug, Serialize)]
pub struct YearlySummary {
    pub year: i32,
    pub total: Decimal,
    pub expenses_total: Decimal,
    pub subscriptions_total: Decimal,
    pub count: usize,
    pub by_month: BTreeMap<u32, Decimal>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionsSummary {
    pub monthly_total: Decimal,
    pub yearly_total: Decimal,
    pub count: usize,
    pub by_category: BTreeMap<String, Decimal>,
}

#[derive(Debug, Serialize)]
pub struct InstallmentsSummary {
    pub due_this_month: Decimal,
    pub unpaid_count: usize,
    pub remaining_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SavingsSummary {
    pub total: Decimal,
    pub by_kind: BTreeMap<String, Decimal>,
    pub active_count: usize,
}

/// One-off expenses only. Recurring items are deliberately not prorated
/// into weekly windows.
pub fn weekly_summary(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<WeeklySummary> {
    let expenses = store::expenses::by_date_range(conn, start, end)?;
    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    Ok(WeeklySummary {
        start,
        end,
        total,
        count: expenses.len(),
    })
}

/// Only active categories resolve to their name; anything else falls back.
fn category_label(categories: &[Category], id: Option<i64>) -> String {
    id.and_then(|id| categories.iter().find(|c| c.id == id && c.active))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn active_subscriptions_with_history(
    conn: &Connection,
) -> Result<Vec<(Subscription, Vec<PriceHistoryEntry>)>> {
    let subs = store::subscriptions::active(conn)?;
    let mut out = Vec::with_capacity(subs.len());
    for sub in subs {
        let history = store::subscriptions::price_history(conn, sub.id)?;
        out.push((sub, history));
    }
    Ok(out)
}

pub fn monthly_summary(conn: &Connection, year: i32, month: u32) -> Result<MonthlySummary> {
    let expenses = store::expenses::by_month(conn, year, month)?;
    let expense_categories = store::categories::get_all(conn, CategoryFamily::Expense)?;
    let subscription_categories = store::categories::get_all(conn, CategoryFamily::Subscription)?;
    let subs = active_subscriptions_with_history(conn)?;

    let expenses_total: Decimal = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();

    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in &expenses {
        let label = category_label(&expense_categories, expense.category_id);
        *by_category.entry(label).or_insert(Decimal::ZERO) += expense.amount;
    }

    let mut subscriptions_total = Decimal::ZERO;
    for (sub, history) in &subs {
        let cost = cost_for_month(sub, history, year, month);
        if cost > Decimal::ZERO {
            subscriptions_total += cost;
            let label = category_label(&subscription_categories, sub.category_id);
            *by_category.entry(label).or_insert(Decimal::ZERO) += cost;
        }
    }

    Ok(MonthlySummary {
        year,
        month,
        total: expenses_total + subscriptions_total,
        expenses_total,
        subscriptions_total,
        count,
        by_category,
    })
}

/// The yearly total is clipped to elapsed months (no projection); the
/// per-month buckets are not, so a chart can show the whole year's shape.
pub fn yearly_summary(conn: &Connection, year: i32, today: NaiveDate) -> Result<YearlySummary> {
    let expenses = store::expenses::by_year(conn, year)?;
    let subs = active_subscriptions_with_history(conn)?;

    let expenses_total: Decimal = expenses.iter().map(|e| e.amount).sum();
    let subscriptions_total: Decimal = subs
        .iter()
        .map(|(sub, history)| cost_for_year(sub, history, year, today))
        .sum();

    let mut by_month: BTreeMap<u32, Decimal> = BTreeMap::new();
    for month in 1..=12 {
        let recurring: Decimal = subs
            .iter()
            .map(|(sub, history)| cost_for_month(sub, history, year, month))
            .sum();
        by_month.insert(month, recurring);
    }
    for expense in &expenses {
        let month = expense.date.month();
        *by_month.entry(month).or_insert(Decimal::ZERO) += expense.amount;
    }

    Ok(YearlySummary {
        year,
        total: expenses_total + subscriptions_total,
        expenses_total,
        subscriptions_total,
        count: expenses.len(),
        by_month,
    })
}

pub fn subscriptions_summary(conn: &Connection, today: NaiveDate) -> Result<SubscriptionsSummary> {
    let subscription_categories = store::categories::get_all(conn, CategoryFamily::Subscription)?;
    let subs = active_subscriptions_with_history(conn)?;
    let (year, month) = (today.year(), today.month());

    let mut monthly_total = Decimal::ZERO;
    let mut yearly_total = Decimal::ZERO;
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
    for (sub, history) in &subs {
        let cost = cost_for_month(sub, history, year, month);
        if cost > Decimal::ZERO {
            monthly_total += cost;
            let label = category_label(&subscription_categories, sub.category_id);
            *by_category.entry(label).or_insert(Decimal::ZERO) += cost;
        }
        yearly_total += cost_for_year(sub, history, year, today);
    }

    Ok(SubscriptionsSummary {
        monthly_total,
        yearly_total,
        count: subs.len(),
        by_category,
    })
}

pub fn installments_summary(conn: &Connection, today: NaiveDate) -> Result<InstallmentsSummary> {
    let unpaid = store::installments::unpaid_for_active(conn)?;

    let due_this_month: Decimal = unpaid
        .iter()
        .filter(|p| p.due_date.year() == today.year() && p.due_date.month() == today.month())
        .map(|p| p.amount)
        .sum();
    let remaining_total: Decimal = unpaid.iter().map(|p| p.amount).sum();

    Ok(InstallmentsSummary {
        due_this_month,
        unpaid_count: unpaid.len(),
        remaining_total,
    })
}

pub fn savings_summary(conn: &Connection) -> Result<SavingsSummary> {
    let savings = store::savings::active(conn)?;
    let mut total = Decimal::ZERO;
    let mut by_kind: BTreeMap<String, Decimal> = BTreeMap::new();
    for saving in &savings {
        let balance = store::savings::balance(conn, saving.id)?;
        total += balance;
        *by_kind
            .entry(saving.kind.as_str().to_string())
            .or_insert(Decimal::ZERO) += balance;
    }
    Ok(SavingsSummary {
        total,
        by_kind,
        active_count: savings.len(),
    })
}
