// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use outgo::models::{Periodicity, PriceHistoryEntry, Subscription};
use outgo::recurrence::{cost_for_month, cost_for_year, price_on, should_count};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn sub(amount: &str, periodicity: Periodicity, start: Option<&str>) -> Subscription {
    Subscription {
        id: 1,
        name: "Streamflix".into(),
        amount: dec(amount),
        category_id: None,
        periodicity,
        start_date: start.map(date),
        active: true,
        notes: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn entry(amount: &str, from: &str, until: Option<&str>) -> PriceHistoryEntry {
    PriceHistoryEntry {
        id: 0,
        subscription_id: 1,
        amount: dec(amount),
        valid_from: date(from),
        valid_until: until.map(date),
    }
}

#[test]
fn monthly_counts_from_start_month_onward() {
    let s = sub("10", Periodicity::Monthly, Some("2024-03-15"));
    assert!(!should_count(&s, 2024, 2));
    assert!(should_count(&s, 2024, 3));
    assert!(should_count(&s, 2024, 12));
    assert!(should_count(&s, 2025, 1));
    assert!(!should_count(&s, 2023, 12));
}

#[test]
fn annual_counts_only_anniversary_month() {
    let s = sub("120", Periodicity::Annual, Some("2023-06-01"));
    assert!(should_count(&s, 2024, 6));
    assert!(!should_count(&s, 2024, 7));
    assert!(!should_count(&s, 2023, 5));
}

#[test]
fn no_start_date_always_counts() {
    let s = sub("10", Periodicity::Monthly, None);
    assert!(should_count(&s, 1999, 1));
    assert!(should_count(&s, 2050, 12));
}

#[test]
fn inactive_never_counts() {
    let mut s = sub("10", Periodicity::Monthly, Some("2024-01-01"));
    s.active = false;
    assert!(!should_count(&s, 2024, 6));
}

#[test]
fn price_on_picks_the_covering_range() {
    let history = vec![
        entry("12.99", "2024-06-10", None),
        entry("9.99", "2024-01-15", Some("2024-06-09")),
    ];
    assert_eq!(price_on(&history, date("2024-03-15")), Some(dec("9.99")));
    assert_eq!(price_on(&history, date("2024-06-09")), Some(dec("9.99")));
    assert_eq!(price_on(&history, date("2024-06-10")), Some(dec("12.99")));
    assert_eq!(price_on(&history, date("2025-01-01")), Some(dec("12.99")));
    assert_eq!(price_on(&history, date("2024-01-01")), None);
}

#[test]
fn cost_for_month_uses_price_in_effect_then() {
    let s = sub("12.99", Periodicity::Monthly, Some("2024-01-15"));
    let history = vec![
        entry("12.99", "2024-06-10", None),
        entry("9.99", "2024-01-15", Some("2024-06-09")),
    ];
    assert_eq!(cost_for_month(&s, &history, 2024, 3), dec("9.99"));
    assert_eq!(cost_for_month(&s, &history, 2024, 7), dec("12.99"));
    assert_eq!(cost_for_month(&s, &history, 2023, 12), Decimal::ZERO);
}

#[test]
fn cost_for_month_falls_back_to_nominal_amount() {
    let s = sub("10", Periodicity::Monthly, Some("2024-01-15"));
    assert_eq!(cost_for_month(&s, &[], 2024, 3), dec("10"));
}

#[test]
fn future_year_costs_nothing() {
    let s = sub("10", Periodicity::Monthly, Some("2024-01-01"));
    assert_eq!(cost_for_year(&s, &[], 2025, date("2024-08-15")), Decimal::ZERO);
}

#[test]
fn current_year_clips_at_current_month() {
    // monthly at 10 since January, evaluated mid-August: 8 months elapsed
    let s = sub("10", Periodicity::Monthly, Some("2024-01-01"));
    assert_eq!(cost_for_year(&s, &[], 2024, date("2024-08-15")), dec("80"));
}

#[test]
fn annual_counts_once_its_month_has_elapsed() {
    // 1200/yr with a June anniversary, evaluated in August 2024
    let s = sub("1200", Periodicity::Annual, Some("2023-06-01"));
    assert_eq!(cost_for_year(&s, &[], 2024, date("2024-08-15")), dec("1200"));
    // evaluated in May, before the anniversary: nothing yet
    assert_eq!(cost_for_year(&s, &[], 2024, date("2024-05-15")), Decimal::ZERO);
}

#[test]
fn annual_without_start_counts_once_per_year() {
    let s = sub("1200", Periodicity::Annual, None);
    assert_eq!(cost_for_year(&s, &[], 2024, date("2024-08-15")), dec("1200"));
}

#[test]
fn past_year_sums_all_twelve_months() {
    let s = sub("10", Periodicity::Monthly, Some("2023-01-01"));
    assert_eq!(cost_for_year(&s, &[], 2023, date("2024-08-15")), dec("120"));
}
