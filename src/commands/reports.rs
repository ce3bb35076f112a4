// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::summary;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_month, pretty_table, today};
use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("week", sub)) => week(conn, sub)?,
        Some(("month", sub)) => month(conn, sub)?,
        Some(("year", sub)) => year(conn, sub)?,
        Some(("subscriptions", sub)) => subscriptions(conn, sub)?,
        Some(("installments", sub)) => installments(conn, sub)?,
        Some(("savings", sub)) => savings(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn week(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;
    let report = summary::weekly_summary(conn, start, end)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{} .. {}: {} across {} expenses",
            report.start,
            report.end,
            fmt_money(&report.total),
            report.count
        );
    }
    Ok(())
}

fn month(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => {
            let now = today();
            (now.year(), now.month())
        }
    };
    let report = summary::monthly_summary(conn, year, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{}-{:02}: {} total ({} expenses, {} subscriptions)",
            report.year,
            report.month,
            fmt_money(&report.total),
            fmt_money(&report.expenses_total),
            fmt_money(&report.subscriptions_total)
        );
        let rows: Vec<Vec<String>> = report
            .by_category
            .iter()
            .map(|(name, amount)| vec![name.clone(), fmt_money(amount)])
            .collect();
        println!("{}", pretty_table(&["Category", "Amount"], rows));
    }
    Ok(())
}

fn year(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let now = today();
    let year = sub.get_one::<i32>("year").copied().unwrap_or(now.year());
    let report = summary::yearly_summary(conn, year, now)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{}: {} total ({} expenses, {} subscriptions)",
            report.year,
            fmt_money(&report.total),
            fmt_money(&report.expenses_total),
            fmt_money(&report.subscriptions_total)
        );
        let rows: Vec<Vec<String>> = report
            .by_month
            .iter()
            .map(|(month, amount)| vec![format!("{year}-{month:02}"), fmt_money(amount)])
            .collect();
        println!("{}", pretty_table(&["Month", "Amount"], rows));
    }
    Ok(())
}

fn subscriptions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = summary::subscriptions_summary(conn, today())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{} active subscriptions: {} this month, {} this year",
            report.count,
            fmt_money(&report.monthly_total),
            fmt_money(&report.yearly_total)
        );
        let rows: Vec<Vec<String>> = report
            .by_category
            .iter()
            .map(|(name, amount)| vec![name.clone(), fmt_money(amount)])
            .collect();
        println!("{}", pretty_table(&["Category", "Monthly"], rows));
    }
    Ok(())
}

fn installments(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = summary::installments_summary(conn, today())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{} due this month, {} unpaid payments, {} remaining",
            fmt_money(&report.due_this_month),
            report.unpaid_count,
            fmt_money(&report.remaining_total)
        );
    }
    Ok(())
}

fn savings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = summary::savings_summary(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        println!(
            "{} across {} active pots",
            fmt_money(&report.total),
            report.active_count
        );
        let rows: Vec<Vec<String>> = report
            .by_kind
            .iter()
            .map(|(kind, amount)| vec![kind.clone(), fmt_money(amount)])
            .collect();
        println!("{}", pretty_table(&["Kind", "Balance"], rows));
    }
    Ok(())
}
