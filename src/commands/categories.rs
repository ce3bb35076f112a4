// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategoryFamily, NewCategory};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{anyhow, Result};
use rusqlite::Connection;

fn family_arg(sub: &clap::ArgMatches) -> Result<CategoryFamily> {
    sub.get_one::<String>("family")
        .unwrap()
        .parse()
        .map_err(|e: String| anyhow!(e))
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let family = family_arg(sub)?;
            let category = store::categories::create(
                conn,
                &NewCategory {
                    name: sub.get_one::<String>("name").unwrap().clone(),
                    icon: sub.get_one::<String>("icon").unwrap().clone(),
                    color: sub.get_one::<String>("color").unwrap().clone(),
                    family,
                },
            )?;
            println!("Added {} category '{}' (id: {})", family, category.name, category.id);
        }
        Some(("list", sub)) => {
            let family = family_arg(sub)?;
            let categories = if sub.get_flag("all") {
                store::categories::get_all(conn, family)?
            } else {
                store::categories::active(conn, family)?
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &categories)? {
                let rows: Vec<Vec<String>> = categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            c.icon.clone(),
                            c.color.clone(),
                            if c.active { "yes" } else { "no" }.into(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Icon", "Color", "Active"], rows)
                );
            }
        }
        Some(("toggle", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let category = store::categories::toggle_active(conn, id)?;
            println!(
                "Category '{}' is now {}",
                category.name,
                if category.active { "active" } else { "inactive" }
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store::categories::delete(conn, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
