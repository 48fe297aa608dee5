// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "VeroTrade", "verotrade"));

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("verotrade.sqlite"))
}

pub fn db_path(cfg: &Config) -> Result<PathBuf> {
    match &cfg.database_path {
        Some(p) => Ok(p.clone()),
        None => default_db_path(),
    }
}

pub fn open_or_init(cfg: &Config) -> Result<Connection> {
    open_path(&db_path(cfg)?)
}

pub fn open_path(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- only the SHA-256 digest of a bearer token is stored
    CREATE TABLE IF NOT EXISTS api_tokens(
        token_hash TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        revoked INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS strategies(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, name),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS strategy_rules(
        id TEXT PRIMARY KEY,
        strategy_id TEXT NOT NULL,
        rule_text TEXT NOT NULL,
        is_checked INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(strategy_id) REFERENCES strategies(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS trades(
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        symbol TEXT NOT NULL,
        market TEXT NOT NULL DEFAULT 'stock',
        side TEXT NOT NULL CHECK(side IN ('Buy','Sell')),
        quantity TEXT NOT NULL,
        entry_price TEXT,
        exit_price TEXT,
        pnl TEXT,
        trade_date TEXT NOT NULL,
        entry_time TEXT,
        exit_time TEXT,
        emotional_state TEXT, -- JSON array of normalized tags
        strategy_id TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f','now')),
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f','now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(strategy_id) REFERENCES strategies(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_trades_user_date ON trades(user_id, trade_date);
    CREATE INDEX IF NOT EXISTS idx_trades_strategy ON trades(strategy_id);
    "#,
    )?;
    Ok(())
}
