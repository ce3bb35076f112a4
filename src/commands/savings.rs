// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewSaving, SavingKind};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: SavingKind = sub
                .get_one::<String>("kind")
                .unwrap()
                .parse()
                .map_err(|e: String| anyhow!(e))?;
            let saving = store::savings::create(
                conn,
                &NewSaving {
                    name: sub.get_one::<String>("name").unwrap().clone(),
                    kind,
                    notes: sub.get_one::<String>("notes").cloned(),
                },
            )?;
            println!("Added {} pot '{}' (id: {})", saving.kind, saving.name, saving.id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("deposit", sub)) => movement(conn, sub, true)?,
        Some(("withdraw", sub)) => movement(conn, sub, false)?,
        Some(("movements", sub)) => movements(conn, sub)?,
        Some(("toggle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let saving = store::savings::toggle_active(conn, id)?;
            println!(
                "Pot '{}' is now {}",
                saving.name,
                if saving.active { "active" } else { "inactive" }
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::savings::delete(conn, id)?;
            println!("Removed pot {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let savings = if sub.get_flag("all") {
        store::savings::get_all(conn)?
    } else {
        store::savings::active(conn)?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &savings)? {
        let mut rows = Vec::new();
        for s in &savings {
            let balance = store::savings::balance(conn, s.id)?;
            rows.push(vec![
                s.id.to_string(),
                s.name.clone(),
                s.kind.to_string(),
                fmt_money(&balance),
                if s.active { "yes" } else { "no" }.into(),
            ]);
        }
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Kind", "Balance", "Active"], rows)
        );
    }
    Ok(())
}

fn movement(conn: &Connection, sub: &clap::ArgMatches, deposit: bool) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").map(String::as_str);
    let movement = if deposit {
        store::savings::deposit(conn, id, amount, description)?
    } else {
        store::savings::withdraw(conn, id, amount, description)?
    };
    let balance = store::savings::balance(conn, id)?;
    println!(
        "Recorded {} of {}; balance is now {}",
        movement.kind,
        fmt_money(&movement.amount),
        fmt_money(&balance)
    );
    Ok(())
}

fn movements(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let movements = store::savings::movements(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &movements)? {
        let rows: Vec<Vec<String>> = movements
            .iter()
            .map(|mv| {
                vec![
                    mv.id.to_string(),
                    mv.kind.to_string(),
                    fmt_money(&mv.amount),
                    mv.description.clone().unwrap_or_default(),
                    mv.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Kind", "Amount", "Description", "When"], rows)
        );
    }
    Ok(())
}
