// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{owner, query_from_matches};
use crate::emotions::EmotionalStateInput;
use crate::models::{NewTrade, Side, Trade};
use crate::query::Page;
use crate::store;
use crate::utils::{
    fmt_opt_decimal, id_for_strategy, maybe_print_json, parse_date, parse_decimal, parse_time,
    parse_uuid, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("rm", sub)) => {
            let user = owner(conn, sub)?;
            let id = parse_uuid(sub.get_one::<String>("id").unwrap(), "trade ID")?;
            store::trades::delete(conn, user, id)?;
            println!("Removed trade {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = owner(conn, sub)?;
    let opt = |k: &str| sub.get_one::<String>(k).map(|s| s.trim().to_string());
    let dec = |k: &str| -> Result<_> {
        match sub.get_one::<String>(k) {
            Some(raw) => Ok(Some(parse_decimal(raw)?)),
            None => Ok(None),
        }
    };
    let time = |k: &str| -> Result<_> {
        match sub.get_one::<String>(k) {
            Some(raw) => Ok(Some(parse_time(raw)?)),
            None => Ok(None),
        }
    };
    let strategy_id = match opt("strategy") {
        Some(name) => Some(id_for_strategy(conn, user, &name)?),
        None => None,
    };

    let new = NewTrade {
        symbol: sub.get_one::<String>("symbol").unwrap().to_string(),
        market: opt("market"),
        side: sub.get_one::<String>("side").unwrap().parse::<Side>()?,
        quantity: parse_decimal(sub.get_one::<String>("quantity").unwrap())?,
        entry_price: dec("entry")?,
        exit_price: dec("exit")?,
        pnl: dec("pnl")?,
        trade_date: parse_date(sub.get_one::<String>("date").unwrap())?,
        entry_time: time("entry_time")?,
        exit_time: time("exit_time")?,
        emotional_state: opt("emotions").map(EmotionalStateInput::Text),
        strategy_id,
        notes: opt("notes"),
    };
    let t = store::trades::create(conn, user, new)?;
    println!(
        "Recorded {} {} x {} on {} (pnl {}) [{}]",
        t.side,
        t.quantity,
        t.symbol,
        t.trade_date,
        fmt_opt_decimal(t.pnl),
        t.id
    );
    Ok(())
}

pub fn query_page(conn: &Connection, sub: &clap::ArgMatches) -> Result<Page<Trade>> {
    let user = owner(conn, sub)?;
    let q = query_from_matches(conn, user, sub)?;
    Ok(store::trades::list(conn, user, &q)?)
}

pub fn trade_row(t: &Trade) -> Vec<String> {
    vec![
        t.trade_date.to_string(),
        t.symbol.clone(),
        t.market.clone(),
        t.side.to_string(),
        t.quantity.to_string(),
        fmt_opt_decimal(t.entry_price),
        fmt_opt_decimal(t.exit_price),
        fmt_opt_decimal(t.pnl),
        t.emotional_state.join(", "),
        t.id.to_string(),
    ]
}

const HEADERS: [&str; 10] = [
    "Date", "Symbol", "Market", "Side", "Qty", "Entry", "Exit", "P&L", "Emotions", "ID",
];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let page = query_page(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &page.data)? {
        let rows = page.data.iter().map(trade_row).collect();
        println!("{}", pretty_table(&HEADERS, rows));
        let p = page.pagination;
        println!(
            "Page {}/{} ({} trades)",
            p.current_page,
            p.total_pages.max(1),
            p.total_count
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = owner(conn, sub)?;
    let id = parse_uuid(sub.get_one::<String>("id").unwrap(), "trade ID")?;
    let t = store::trades::get(conn, user, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        println!("{}", pretty_table(&HEADERS, vec![trade_row(&t)]));
        if let Some(notes) = &t.notes {
            println!("Notes: {}", notes);
        }
    }
    Ok(())
}
