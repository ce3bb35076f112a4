// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure recurrence and pricing rules for subscriptions. Nothing here touches
//! the store; `today` is always passed in, so summaries never project cost
//! into periods that have not elapsed.

use crate::models::{Periodicity, PriceHistoryEntry, Subscription};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Whether the subscription contributes a payment in (year, month).
///
/// Inactive never counts. Without a start date the item is always active.
/// Annual items pay once a year, in their anniversary month.
pub fn should_count(sub: &Subscription, year: i32, month: u32) -> bool {
    if !sub.active {
        return false;
    }
    let Some(start) = sub.start_date else {
        return true;
    };
    if year < start.year() || (year == start.year() && month < start.month()) {
        return false;
    }
    match sub.periodicity {
        Periodicity::Annual => month == start.month(),
        Periodicity::Monthly => true,
    }
}

/// The price in effect on `date`, if the history covers it. The open-ended
/// entry matches any date on or after its start.
pub fn price_on(history: &[PriceHistoryEntry], date: NaiveDate) -> Option<Decimal> {
    history
        .iter()
        .find(|e| e.valid_from <= date && e.valid_until.is_none_or(|until| date <= until))
        .map(|e| e.amount)
}

/// Cost the subscription contributes to (year, month), at the price that was
/// in effect then. The 15th stands in for the month to avoid edge-of-month
/// ambiguity; with no covering history entry the current nominal amount is
/// used.
pub fn cost_for_month(
    sub: &Subscription,
    history: &[PriceHistoryEntry],
    year: i32,
    month: u32,
) -> Decimal {
    if !should_count(sub, year, month) {
        return Decimal::ZERO;
    }
    let Some(probe) = NaiveDate::from_ymd_opt(year, month, 15) else {
        return Decimal::ZERO;
    };
    price_on(history, probe).unwrap_or(sub.amount)
}

/// Actual cost for `year`: the sum of monthly costs, clipped so nothing is
/// projected. Future years yield zero; the current year is summed only
/// through `today`'s month, so an annual payment counts only once its
/// anniversary month has elapsed.
pub fn cost_for_year(
    sub: &Subscription,
    history: &[PriceHistoryEntry],
    year: i32,
    today: NaiveDate,
) -> Decimal {
    if !sub.active || year > today.year() {
        return Decimal::ZERO;
    }
    // Annual with no start date has no anniversary to key on; it counts as
    // one payment per elapsed year.
    if sub.periodicity == Periodicity::Annual && sub.start_date.is_none() {
        return sub.amount;
    }
    let last_month = if year == today.year() { today.month() } else { 12 };
    (1..=last_month)
        .map(|month| cost_for_month(sub, history, year, month))
        .sum()
}
