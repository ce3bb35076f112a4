// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::{Category, CategoryFamily, CategoryPatch, NewCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, name, icon, color, active, family";

fn row_to_category(r: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        icon: r.get(2)?,
        color: r.get(3)?,
        active: r.get(4)?,
        family: r.get(5)?,
    })
}

pub fn create(conn: &Connection, new: &NewCategory) -> Result<Category> {
    if new.name.trim().is_empty() {
        return Err(StoreError::validation("category name must not be empty"));
    }
    conn.execute(
        "INSERT INTO categories(name, icon, color, active, family) VALUES (?1, ?2, ?3, 1, ?4)",
        params![new.name.trim(), new.icon, new.color, new.family],
    )?;
    require(conn, conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Category>> {
    let found = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM categories WHERE id=?1"),
            params![id],
            row_to_category,
        )
        .optional()?;
    Ok(found)
}

fn require(conn: &Connection, id: i64) -> Result<Category> {
    get_by_id(conn, id)?.ok_or_else(|| StoreError::not_found("category", id))
}

pub fn id_for_name(conn: &Connection, family: CategoryFamily, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM categories WHERE family=?1 AND name=?2",
        params![family, name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| StoreError::validation(format!("unknown {} category '{}'", family, name)))
}

pub fn update(conn: &Connection, id: i64, patch: &CategoryPatch) -> Result<Category> {
    let mut category = require(conn, id)?;
    patch.apply_to(&mut category);
    if category.name.trim().is_empty() {
        return Err(StoreError::validation("category name must not be empty"));
    }
    conn.execute(
        "UPDATE categories SET name=?1, icon=?2, color=?3, active=?4 WHERE id=?5",
        params![category.name, category.icon, category.color, category.active, id],
    )?;
    require(conn, id)
}

/// The only (de)activation path; normal flows deactivate instead of deleting.
pub fn toggle_active(conn: &Connection, id: i64) -> Result<Category> {
    let category = require(conn, id)?;
    update(
        conn,
        id,
        &CategoryPatch {
            active: Some(!category.active),
            ..Default::default()
        },
    )
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    Ok(())
}

pub fn get_all(conn: &Connection, family: CategoryFamily) -> Result<Vec<Category>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM categories WHERE family=?1 ORDER BY name"),
        family,
    )
}

pub fn active(conn: &Connection, family: CategoryFamily) -> Result<Vec<Category>> {
    query_vec(
        conn,
        &format!("SELECT {COLUMNS} FROM categories WHERE family=?1 AND active=1 ORDER BY name"),
        family,
    )
}

fn query_vec(conn: &Connection, sql: &str, family: CategoryFamily) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([family], row_to_category)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
