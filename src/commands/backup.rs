// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::fs;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = sub.get_one::<String>("out").unwrap();
            let doc = backup::export(conn)?;
            fs::write(out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("Failed to write {}", out))?;
            println!(
                "Exported {} expenses, {} subscriptions, {} installments, {} savings to {}",
                doc.expenses.len(),
                doc.subscriptions.len(),
                doc.installments.len(),
                doc.savings.len(),
                out
            );
        }
        Some(("import", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let json =
                fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
            let doc = backup::parse_document(&json)?;
            backup::import(conn, &doc)?;
            println!(
                "Imported backup from {} (version {}, exported {})",
                path,
                doc.version,
                doc.export_date.format("%Y-%m-%d %H:%M")
            );
        }
        _ => {}
    }
    Ok(())
}
