// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategoryFamily, NewSubscription, Periodicity, SubscriptionPatch};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("toggle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let subscription = store::subscriptions::toggle_active(conn, id, today())?;
            println!(
                "Subscription '{}' is now {}",
                subscription.name,
                if subscription.active { "active" } else { "inactive" }
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::subscriptions::delete(conn, id)?;
            println!("Removed subscription {}", id);
        }
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn periodicity_arg(sub: &clap::ArgMatches) -> Result<Option<Periodicity>> {
    sub.get_one::<String>("periodicity")
        .map(|p| p.parse().map_err(|e: String| anyhow!(e)))
        .transpose()
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().clone();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let periodicity = periodicity_arg(sub)?.unwrap_or(Periodicity::Monthly);
    let start_date = sub
        .get_one::<String>("start")
        .map(|s| parse_date(s))
        .transpose()?;
    let notes = sub.get_one::<String>("notes").cloned();

    let category_id =
        store::categories::id_for_name(conn, CategoryFamily::Subscription, category)?;
    let subscription = store::subscriptions::create(
        conn,
        &NewSubscription {
            name,
            amount,
            category_id,
            periodicity,
            start_date,
            notes,
        },
        today(),
    )?;
    println!(
        "Added {} subscription '{}' at {} (id: {})",
        subscription.periodicity,
        subscription.name,
        fmt_money(&subscription.amount),
        subscription.id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let subscriptions = if sub.get_flag("all") {
        store::subscriptions::get_all(conn)?
    } else {
        store::subscriptions::active(conn)?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &subscriptions)? {
        let categories = store::categories::get_all(conn, CategoryFamily::Subscription)?;
        let rows: Vec<Vec<String>> = subscriptions
            .iter()
            .map(|s| {
                let category = s
                    .category_id
                    .and_then(|id| categories.iter().find(|c| c.id == id))
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                vec![
                    s.id.to_string(),
                    s.name.clone(),
                    fmt_money(&s.amount),
                    s.periodicity.to_string(),
                    s.start_date.map(|d| d.to_string()).unwrap_or_default(),
                    category,
                    if s.active { "yes" } else { "no" }.into(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Name", "Amount", "Periodicity", "Start", "Category", "Active"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut patch = SubscriptionPatch::default();
    if let Some(name) = sub.get_one::<String>("name") {
        patch.name = Some(name.clone());
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(amount)?);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        patch.category_id = Some(store::categories::id_for_name(
            conn,
            CategoryFamily::Subscription,
            category,
        )?);
    }
    patch.periodicity = periodicity_arg(sub)?;
    if sub.get_flag("clear-start") {
        patch.start_date = Some(None);
    } else if let Some(start) = sub.get_one::<String>("start") {
        patch.start_date = Some(Some(parse_date(start)?));
    }
    if sub.get_flag("clear-notes") {
        patch.notes = Some(None);
    } else if let Some(notes) = sub.get_one::<String>("notes") {
        patch.notes = Some(Some(notes.clone()));
    }
    let subscription = store::subscriptions::update(conn, id, &patch, today())?;
    println!(
        "Updated subscription {} ({}, {})",
        subscription.id,
        subscription.name,
        fmt_money(&subscription.amount)
    );
    Ok(())
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let entries = store::subscriptions::price_history(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &entries)? {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| {
                vec![
                    fmt_money(&e.amount),
                    e.valid_from.to_string(),
                    e.valid_until
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "current".into()),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Amount", "From", "Until"], rows));
    }
    Ok(())
}
