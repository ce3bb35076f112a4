// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StoreError};
use crate::models::CategoryFamily;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Outgo", "outgo"));

/// Target schema version, tracked in PRAGMA user_version.
pub const SCHEMA_VERSION: i64 = 3;

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| StoreError::Unavailable("could not determine platform data dir".into()))?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)
        .map_err(|e| StoreError::Unavailable(format!("create data dir: {e}")))?;
    Ok(data_dir.join("outgo.sqlite"))
}

/// Open the store, creating or migrating the schema as needed. A failure
/// here is fatal to the session and is reported upward untouched.
pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn = Connection::open(&path)
        .map_err(|e| StoreError::Unavailable(format!("open store at {}: {e}", path.display())))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Idempotent schema setup. Creation, legacy migration, default-category
/// seeding, and the version stamp all run inside one transaction, so a
/// partially initialized store can never be observed.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    migrate_legacy_categories(&tx)?;
    create_tables(&tx)?;
    seed_default_categories(&tx)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Version 1 kept a single `categories` table with no family tag. Fan those
/// records out into the expense family in place: ids and all other fields
/// are preserved, nothing is deleted.
fn migrate_legacy_categories(conn: &Connection) -> Result<()> {
    if table_exists(conn, "categories")? && !column_exists(conn, "categories", "family")? {
        conn.execute_batch(
            "ALTER TABLE categories ADD COLUMN family TEXT NOT NULL DEFAULT 'expense';",
        )?;
    }
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [name],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let name: String = r.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        name TEXT NOT NULL,
        pin TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        icon TEXT NOT NULL DEFAULT '',
        color TEXT NOT NULL DEFAULT '',
        active INTEGER NOT NULL DEFAULT 1,
        family TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_family_name
        ON categories(family, name);

    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        description TEXT NOT NULL,
        category_id INTEGER,
        date TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);

    CREATE TABLE IF NOT EXISTS subscriptions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        amount TEXT NOT NULL,
        category_id INTEGER,
        periodicity TEXT NOT NULL CHECK(periodicity IN ('monthly','annual')),
        start_date TEXT,
        active INTEGER NOT NULL DEFAULT 1,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_subscriptions_active ON subscriptions(active);

    CREATE TABLE IF NOT EXISTS subscription_price_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        subscription_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        valid_from TEXT NOT NULL,
        valid_until TEXT,
        FOREIGN KEY(subscription_id) REFERENCES subscriptions(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_price_history_subscription
        ON subscription_price_history(subscription_id);

    CREATE TABLE IF NOT EXISTS installments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        total_installments INTEGER NOT NULL,
        installment_amount TEXT NOT NULL,
        category_id INTEGER,
        periodicity TEXT NOT NULL CHECK(periodicity IN ('monthly','biweekly')),
        start_date TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS installment_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        installment_id INTEGER NOT NULL,
        seq INTEGER NOT NULL,
        amount TEXT NOT NULL,
        due_date TEXT NOT NULL,
        paid INTEGER NOT NULL DEFAULT 0,
        paid_date TEXT,
        UNIQUE(installment_id, seq),
        FOREIGN KEY(installment_id) REFERENCES installments(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_payments_due ON installment_payments(due_date);

    CREATE TABLE IF NOT EXISTS savings(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('cash','bank','investment','other')),
        active INTEGER NOT NULL DEFAULT 1,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT
    );

    CREATE TABLE IF NOT EXISTS savings_movements(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        saving_id INTEGER NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('deposit','withdrawal')),
        amount TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY(saving_id) REFERENCES savings(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_movements_saving ON savings_movements(saving_id);
    "#,
    )?;
    Ok(())
}

/// Seed a family's default categories when that family is empty. Seeding
/// happens in the same transaction as table creation; deferring it past
/// store creation is how empty-category bugs happen.
fn seed_default_categories(conn: &Connection) -> Result<()> {
    seed_family(
        conn,
        CategoryFamily::Expense,
        &[
            ("Food", "🍔", "#10B981"),
            ("Transport", "🚗", "#3B82F6"),
            ("Utilities", "💡", "#F59E0B"),
            ("Groceries", "🛒", "#059669"),
            ("Shopping", "🛍️", "#8B5CF6"),
            ("Dining Out", "🍽️", "#F97316"),
            ("Entertainment", "🎬", "#EC4899"),
            ("Health", "⚕️", "#EF4444"),
            ("Other", "📦", "#6B7280"),
        ],
    )?;
    seed_family(
        conn,
        CategoryFamily::Subscription,
        &[
            ("AI & Productivity", "fa-robot", "#6366F1"),
            ("Video Streaming", "fa-film", "#EF4444"),
            ("Music Streaming", "fa-headphones", "#10B981"),
            ("Cloud & Infrastructure", "fa-cloud", "#3B82F6"),
            ("Wellness", "fa-heart-pulse", "#EC4899"),
            ("Education", "fa-graduation-cap", "#F59E0B"),
        ],
    )?;
    seed_family(
        conn,
        CategoryFamily::Installment,
        &[
            ("Electronics", "fa-laptop", "#3B82F6"),
            ("Home & Furniture", "fa-couch", "#10B981"),
            ("Travel", "fa-plane", "#F59E0B"),
            ("Other", "fa-box", "#6B7280"),
        ],
    )?;
    Ok(())
}

fn seed_family(
    conn: &Connection,
    family: CategoryFamily,
    defaults: &[(&str, &str, &str)],
) -> Result<()> {
    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM categories WHERE family=?1",
        [family],
        |r| r.get(0),
    )?;
    if existing > 0 {
        return Ok(());
    }
    let mut stmt = conn.prepare(
        "INSERT INTO categories(name, icon, color, active, family) VALUES (?1, ?2, ?3, 1, ?4)",
    )?;
    for (name, icon, color) in defaults {
        stmt.execute(rusqlite::params![name, icon, color, family])?;
    }
    Ok(())
}

/// Delete every record from every collection, children before parents.
/// Only the backup importer calls this, inside its own transaction.
pub fn clear_all_data(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    DELETE FROM savings_movements;
    DELETE FROM savings;
    DELETE FROM installment_payments;
    DELETE FROM installments;
    DELETE FROM subscription_price_history;
    DELETE FROM subscriptions;
    DELETE FROM expenses;
    DELETE FROM categories;
    DELETE FROM users;
    "#,
    )?;
    Ok(())
}
