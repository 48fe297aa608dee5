// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::emotions;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// One finding per row: (issue, detail).
pub fn findings(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Missing market (rows written before the NOT NULL constraint)
    let mut stmt =
        conn.prepare("SELECT id FROM trades WHERE market IS NULL OR trim(market)='' ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        rows.push(vec!["trade_missing_market".into(), id]);
    }

    // 2) Emotional states that do not survive normalization unchanged
    let mut stmt2 = conn.prepare(
        "SELECT id, emotional_state FROM trades WHERE emotional_state IS NOT NULL ORDER BY id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: String = r.get(0)?;
        let raw: String = r.get(1)?;
        let tags = emotions::parse_stored(Some(&raw));
        let canonical = serde_json::to_string(&tags)?;
        if canonical != raw {
            rows.push(vec![
                "emotional_state_not_normalized".into(),
                format!("{} {} -> {}", id, raw, canonical),
            ]);
        }
    }

    // 3) Trades linked to a strategy owned by someone else
    let mut stmt3 = conn.prepare(
        "SELECT t.id, t.strategy_id FROM trades t JOIN strategies s ON s.id=t.strategy_id
         WHERE s.user_id != t.user_id ORDER BY t.id",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: String = r.get(0)?;
        let sid: String = r.get(1)?;
        rows.push(vec![
            "strategy_owner_mismatch".into(),
            format!("{} -> {}", id, sid),
        ]);
    }

    // 4) Unparseable numeric columns
    let mut stmt4 = conn.prepare("SELECT id, quantity, pnl FROM trades ORDER BY id")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: String = r.get(0)?;
        let qty: String = r.get(1)?;
        let pnl: Option<String> = r.get(2)?;
        if qty.parse::<rust_decimal::Decimal>().is_err() {
            rows.push(vec!["bad_quantity".into(), format!("{} {}", id, qty)]);
        }
        if let Some(p) = pnl {
            if p.parse::<rust_decimal::Decimal>().is_err() {
                rows.push(vec!["bad_pnl".into(), format!("{} {}", id, p)]);
            }
        }
    }

    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
