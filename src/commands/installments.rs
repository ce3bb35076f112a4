// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategoryFamily, InstallmentPeriodicity, NewInstallment};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{anyhow, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("schedule", sub)) => schedule(conn, sub)?,
        Some(("pay", sub)) => set_paid(conn, sub, true)?,
        Some(("unpay", sub)) => set_paid(conn, sub, false)?,
        Some(("toggle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let installment = store::installments::toggle_active(conn, id)?;
            println!(
                "Purchase '{}' is now {}",
                installment.name,
                if installment.active { "active" } else { "inactive" }
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::installments::delete(conn, id)?;
            println!("Removed purchase {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().clone();
    let total_amount = parse_decimal(sub.get_one::<String>("total").unwrap())?;
    let total_installments = *sub.get_one::<u32>("count").unwrap();
    let installment_amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_decimal(a)?,
        None if total_installments > 0 => total_amount / Decimal::from(total_installments),
        None => Decimal::ZERO,
    };
    let category = sub.get_one::<String>("category").unwrap();
    let periodicity: InstallmentPeriodicity = sub
        .get_one::<String>("periodicity")
        .unwrap()
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let start_date = parse_date(sub.get_one::<String>("start").unwrap())?;
    let notes = sub.get_one::<String>("notes").cloned();

    let category_id =
        store::categories::id_for_name(conn, CategoryFamily::Installment, category)?;
    let installment = store::installments::create(
        conn,
        &NewInstallment {
            name,
            total_amount,
            total_installments,
            installment_amount,
            category_id,
            periodicity,
            start_date,
            notes,
        },
    )?;
    println!(
        "Added '{}': {} x {} starting {} (id: {})",
        installment.name,
        installment.total_installments,
        fmt_money(&installment.installment_amount),
        installment.start_date,
        installment.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let installments = if sub.get_flag("all") {
        store::installments::get_all(conn)?
    } else {
        store::installments::active(conn)?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &installments)? {
        let rows: Vec<Vec<String>> = installments
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.name.clone(),
                    fmt_money(&i.total_amount),
                    format!("{} x {}", i.total_installments, fmt_money(&i.installment_amount)),
                    i.periodicity.to_string(),
                    i.start_date.to_string(),
                    if i.active { "yes" } else { "no" }.into(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Total", "Schedule", "Periodicity", "Start", "Active"],
                rows,
            )
        );
    }
    Ok(())
}

fn schedule(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let payments = store::installments::schedule(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &payments)? {
        let rows: Vec<Vec<String>> = payments
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.seq.to_string(),
                    fmt_money(&p.amount),
                    p.due_date.to_string(),
                    if p.paid { "paid" } else { "due" }.into(),
                    p.paid_date.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Seq", "Amount", "Due", "Status", "Paid on"], rows)
        );
    }
    Ok(())
}

fn set_paid(conn: &Connection, sub: &clap::ArgMatches, paid: bool) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let payment = store::installments::set_payment_paid(conn, id, paid, today())?;
    println!(
        "Payment {} (installment {}, seq {}) marked {}",
        payment.id,
        payment.installment_id,
        payment.seq,
        if payment.paid { "paid" } else { "unpaid" }
    );
    Ok(())
}
