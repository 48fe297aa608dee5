// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Error;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("Invalid time '{}', expected HH:MM[:SS]", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_uuid(s: &str, field: &str) -> std::result::Result<Uuid, Error> {
    Uuid::parse_str(s.trim())
        .map_err(|_| Error::validation(format!("Invalid {} '{}', expected a UUID", field, s)))
}

pub fn fmt_opt_decimal(d: Option<Decimal>) -> String {
    d.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_user(conn: &Connection, email: &str) -> Result<Uuid> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE email=?1")?;
    let id: String = stmt
        .query_row(params![email.trim().to_lowercase()], |r| r.get(0))
        .with_context(|| format!("User '{}' not found", email))?;
    Ok(Uuid::parse_str(&id)?)
}

pub fn id_for_strategy(conn: &Connection, user_id: Uuid, name: &str) -> Result<Uuid> {
    let mut stmt = conn.prepare("SELECT id FROM strategies WHERE user_id=?1 AND name=?2")?;
    let id: String = stmt
        .query_row(params![user_id.to_string(), name.trim()], |r| r.get(0))
        .with_context(|| format!("Strategy '{}' not found", name))?;
    Ok(Uuid::parse_str(&id)?)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
