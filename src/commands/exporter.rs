// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{owner, query_from_matches};
use crate::store;
use crate::utils::fmt_opt_decimal;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => export_trades(conn, sub),
        _ => Ok(()),
    }
}

fn export_trades(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let user = owner(conn, sub)?;
    let q = query_from_matches(conn, user, sub)?;
    let mut trades = store::trades::fetch_all(conn, user, &q.filter)?;
    trades.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "trade_date",
                "symbol",
                "market",
                "side",
                "quantity",
                "entry_price",
                "exit_price",
                "pnl",
                "emotional_state",
                "strategy_id",
                "notes",
            ])?;
            for t in &trades {
                wtr.write_record([
                    t.id.to_string(),
                    t.trade_date.to_string(),
                    t.symbol.clone(),
                    t.market.clone(),
                    t.side.to_string(),
                    t.quantity.to_string(),
                    fmt_opt_decimal(t.entry_price),
                    fmt_opt_decimal(t.exit_price),
                    fmt_opt_decimal(t.pnl),
                    t.emotional_state.join("|"),
                    t.strategy_id.map(|s| s.to_string()).unwrap_or_default(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&trades)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    println!("Exported {} trades to {}", trades.len(), out);
    Ok(())
}
