// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategoryFamily, ExpensePatch, NewExpense};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::expenses::delete(conn, id)?;
            println!("Removed expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().clone();
    let category = sub.get_one::<String>("category").unwrap();
    let notes = sub.get_one::<String>("notes").cloned();

    let category_id = store::categories::id_for_name(conn, CategoryFamily::Expense, category)?;
    let expense = store::expenses::create(
        conn,
        &NewExpense {
            amount,
            description,
            category_id,
            date,
            notes,
        },
    )?;
    println!(
        "Recorded {} on {} for '{}' (id: {})",
        fmt_money(&expense.amount),
        expense.date,
        expense.description,
        expense.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut expenses = if let Some(month) = sub.get_one::<String>("month") {
        let (year, month) = parse_month(month)?;
        store::expenses::by_month(conn, year, month)?
    } else if let Some(limit) = sub.get_one::<usize>("limit") {
        store::expenses::recent(conn, *limit)?
    } else {
        store::expenses::get_all(conn)?
    };
    if let Some(category) = sub.get_one::<String>("category") {
        let category_id =
            store::categories::id_for_name(conn, CategoryFamily::Expense, category)?;
        expenses.retain(|e| e.category_id == Some(category_id));
    }

    if !maybe_print_json(json_flag, jsonl_flag, &expenses)? {
        let categories = store::categories::get_all(conn, CategoryFamily::Expense)?;
        let rows: Vec<Vec<String>> = expenses
            .iter()
            .map(|e| {
                let category = e
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id))
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.description.clone(),
                    fmt_money(&e.amount),
                    category,
                    e.notes.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Description", "Amount", "Category", "Notes"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut patch = ExpensePatch::default();
    if let Some(amount) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(amount)?);
    }
    if let Some(description) = sub.get_one::<String>("description") {
        patch.description = Some(description.clone());
    }
    if let Some(category) = sub.get_one::<String>("category") {
        patch.category_id = Some(store::categories::id_for_name(
            conn,
            CategoryFamily::Expense,
            category,
        )?);
    }
    if let Some(date) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(date)?);
    }
    if let Some(notes) = sub.get_one::<String>("notes") {
        patch.notes = Some(notes.clone());
    }
    let expense = store::expenses::update(conn, id, &patch)?;
    println!("Updated expense {} ({})", expense.id, expense.description);
    Ok(())
}
