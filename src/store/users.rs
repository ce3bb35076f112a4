// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::User;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Single-profile store: exactly one row, kept for the backup document.
pub fn current_user(conn: &Connection) -> Result<Option<User>> {
    let found = conn
        .query_row(
            "SELECT name, pin, created_at FROM users WHERE id=1",
            [],
            |r| {
                Ok(User {
                    name: r.get(0)?,
                    pin: r.get(1)?,
                    created_at: r.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(found)
}

pub fn set_user(conn: &Connection, name: &str, pin: &str) -> Result<User> {
    if name.trim().is_empty() {
        return Err(StoreError::validation("user name must not be empty"));
    }
    let created_at = match current_user(conn)? {
        Some(existing) => existing.created_at,
        None => Utc::now(),
    };
    conn.execute(
        "INSERT INTO users(id, name, pin, created_at) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name=excluded.name, pin=excluded.pin",
        params![name.trim(), pin, created_at],
    )?;
    current_user(conn)?.ok_or_else(|| StoreError::not_found("user", 1))
}

pub fn replace_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users(id, name, pin, created_at) VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name=excluded.name, pin=excluded.pin,
         created_at=excluded.created_at",
        params![user.name, user.pin, user.created_at],
    )?;
    Ok(())
}
