// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let pin = sub.get_one::<String>("pin").unwrap();
            let user = store::users::set_user(conn, name, pin)?;
            println!("Profile set for '{}'", user.name);
        }
        Some(("show", _)) => match store::users::current_user(conn)? {
            Some(user) => println!(
                "{} (since {})",
                user.name,
                user.created_at.format("%Y-%m-%d")
            ),
            None => println!("No profile set; run 'outgo user set'"),
        },
        _ => {}
    }
    Ok(())
}
