// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use uuid::Uuid;

use super::{col, now_ts, opt_col, opt_string, strategies};
use crate::emotions;
use crate::error::{Error, Result};
use crate::models::{
    NewTrade, Trade, TradeUpdate, derive_pnl, normalize_market, normalize_symbol,
    validate_quantity,
};
use crate::query::{Page, PnlFilter, TradeFilter, TradeQuery};

const COLUMNS: &str = "id, user_id, symbol, market, side, quantity, entry_price, exit_price, pnl, \
     trade_date, entry_time, exit_time, emotional_state, strategy_id, notes, created_at, updated_at";

const ORDER: &str = " ORDER BY trade_date DESC, created_at DESC, rowid DESC";

fn map_trade(r: &Row<'_>) -> rusqlite::Result<Trade> {
    let emotional: Option<String> = r.get(12)?;
    let market: Option<String> = r.get(3)?;
    Ok(Trade {
        id: col(r, 0)?,
        user_id: col(r, 1)?,
        symbol: r.get(2)?,
        market: normalize_market(market.as_deref()),
        side: col(r, 4)?,
        quantity: col(r, 5)?,
        entry_price: opt_col(r, 6)?,
        exit_price: opt_col(r, 7)?,
        pnl: opt_col(r, 8)?,
        trade_date: col(r, 9)?,
        entry_time: opt_col(r, 10)?,
        exit_time: opt_col(r, 11)?,
        emotional_state: emotions::parse_stored(emotional.as_deref()),
        strategy_id: opt_col(r, 13)?,
        notes: r.get(14)?,
        created_at: r.get(15)?,
        updated_at: r.get(16)?,
    })
}

fn encode_tags(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

pub fn create(conn: &Connection, user_id: Uuid, new: NewTrade) -> Result<Trade> {
    let symbol = normalize_symbol(&new.symbol)?;
    let quantity = validate_quantity(new.quantity)?;
    if let Some(sid) = new.strategy_id {
        strategies::ensure_owned(conn, user_id, sid)?;
    }
    let pnl = match new.pnl {
        Some(p) => Some(p),
        None => derive_pnl(new.side, quantity, new.entry_price, new.exit_price)?,
    };
    let tags = emotions::from_input(new.emotional_state);
    let id = Uuid::new_v4();
    let ts = now_ts();

    conn.execute(
        &format!(
            "INSERT INTO trades({}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17)",
            COLUMNS
        ),
        params![
            id.to_string(),
            user_id.to_string(),
            symbol,
            normalize_market(new.market.as_deref()),
            new.side.as_str(),
            quantity.to_string(),
            opt_string(new.entry_price),
            opt_string(new.exit_price),
            opt_string(pnl),
            new.trade_date.to_string(),
            opt_string(new.entry_time),
            opt_string(new.exit_time),
            encode_tags(&tags)?,
            opt_string(new.strategy_id),
            clean_notes(new.notes),
            ts,
            ts,
        ],
    )?;
    tracing::info!(trade = %id, user = %user_id, symbol = %symbol, "trade created");
    get(conn, user_id, id)
}

pub fn get(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<Trade> {
    conn.query_row(
        &format!("SELECT {} FROM trades WHERE id=?1 AND user_id=?2", COLUMNS),
        params![id.to_string(), user_id.to_string()],
        map_trade,
    )
    .optional()?
    .ok_or(Error::NotFound("Trade"))
}

pub fn update(conn: &Connection, user_id: Uuid, id: Uuid, upd: TradeUpdate) -> Result<Trade> {
    let mut t = get(conn, user_id, id)?;
    if upd.is_empty() {
        return Ok(t);
    }
    let prices_touched = upd.entry_price.is_some()
        || upd.exit_price.is_some()
        || upd.quantity.is_some()
        || upd.side.is_some();
    // A stored pnl that equals what the fills imply follows the fills.
    let pnl_was_derived = t.pnl.is_some()
        && derive_pnl(t.side, t.quantity, t.entry_price, t.exit_price)
            .ok()
            .flatten()
            == t.pnl;

    if let Some(symbol) = upd.symbol {
        t.symbol = normalize_symbol(&symbol)?;
    }
    if let Some(market) = upd.market {
        t.market = normalize_market(Some(&market));
    }
    if let Some(side) = upd.side {
        t.side = side;
    }
    if let Some(q) = upd.quantity {
        t.quantity = validate_quantity(q)?;
    }
    if let Some(v) = upd.entry_price {
        t.entry_price = v;
    }
    if let Some(v) = upd.exit_price {
        t.exit_price = v;
    }
    match upd.pnl {
        Some(v) => t.pnl = v,
        None if prices_touched => {
            match derive_pnl(t.side, t.quantity, t.entry_price, t.exit_price)? {
                Some(p) => t.pnl = Some(p),
                None if pnl_was_derived => t.pnl = None,
                None => {}
            }
        }
        None => {}
    }
    if let Some(d) = upd.trade_date {
        t.trade_date = d;
    }
    if let Some(v) = upd.entry_time {
        t.entry_time = v;
    }
    if let Some(v) = upd.exit_time {
        t.exit_time = v;
    }
    if let Some(v) = upd.emotional_state {
        t.emotional_state = emotions::from_input(v);
    }
    if let Some(v) = upd.strategy_id {
        if let Some(sid) = v {
            strategies::ensure_owned(conn, user_id, sid)?;
        }
        t.strategy_id = v;
    }
    if let Some(v) = upd.notes {
        t.notes = clean_notes(v);
    }

    conn.execute(
        "UPDATE trades SET symbol=?1, market=?2, side=?3, quantity=?4, entry_price=?5,
             exit_price=?6, pnl=?7, trade_date=?8, entry_time=?9, exit_time=?10,
             emotional_state=?11, strategy_id=?12, notes=?13, updated_at=?14
         WHERE id=?15 AND user_id=?16",
        params![
            t.symbol,
            t.market,
            t.side.as_str(),
            t.quantity.to_string(),
            opt_string(t.entry_price),
            opt_string(t.exit_price),
            opt_string(t.pnl),
            t.trade_date.to_string(),
            opt_string(t.entry_time),
            opt_string(t.exit_time),
            encode_tags(&t.emotional_state)?,
            opt_string(t.strategy_id),
            t.notes,
            now_ts(),
            id.to_string(),
            user_id.to_string(),
        ],
    )?;
    tracing::info!(trade = %id, user = %user_id, "trade updated");
    get(conn, user_id, id)
}

pub fn delete(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM trades WHERE id=?1 AND user_id=?2",
        params![id.to_string(), user_id.to_string()],
    )?;
    if n == 0 {
        return Err(Error::NotFound("Trade"));
    }
    tracing::info!(trade = %id, user = %user_id, "trade deleted");
    Ok(())
}

/// SQL predicate for every filter except emotional state, which is matched
/// after the fetch.
fn where_clause(user_id: Uuid, f: &TradeFilter) -> (String, Vec<String>) {
    let mut sql = String::from(" WHERE user_id=?");
    let mut args = vec![user_id.to_string()];

    if let Some(sid) = f.strategy_id {
        sql.push_str(" AND strategy_id=?");
        args.push(sid.to_string());
    }
    if let Some(sym) = &f.symbol {
        sql.push_str(" AND upper(symbol) LIKE ? ESCAPE '\\'");
        args.push(format!("%{}%", escape_like(&sym.to_uppercase())));
    }
    if let Some(m) = &f.market {
        sql.push_str(" AND lower(market)=?");
        args.push(m.to_lowercase());
    }
    if let Some(d) = f.date_from {
        sql.push_str(" AND trade_date>=?");
        args.push(d.to_string());
    }
    if let Some(d) = f.date_to {
        sql.push_str(" AND trade_date<=?");
        args.push(d.to_string());
    }
    match f.pnl {
        PnlFilter::All => {}
        PnlFilter::Profitable => sql.push_str(" AND pnl IS NOT NULL AND CAST(pnl AS REAL) > 0"),
        PnlFilter::Lossable => sql.push_str(" AND pnl IS NOT NULL AND CAST(pnl AS REAL) < 0"),
    }
    if let Some(side) = f.side {
        sql.push_str(" AND side=?");
        args.push(side.as_str().to_string());
    }
    (sql, args)
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn select(conn: &Connection, sql: &str, args: &[String]) -> Result<Vec<Trade>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), map_trade)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// All of the caller's trades matching `filter`, newest first.
pub fn fetch_all(conn: &Connection, user_id: Uuid, filter: &TradeFilter) -> Result<Vec<Trade>> {
    let (clause, args) = where_clause(user_id, filter);
    let sql = format!("SELECT {} FROM trades{}{}", COLUMNS, clause, ORDER);
    let mut trades = select(conn, &sql, &args)?;
    if let Some(wanted) = &filter.emotional_states {
        trades.retain(|t| emotions::matches_any(t, wanted));
    }
    Ok(trades)
}

pub fn list(conn: &Connection, user_id: Uuid, q: &TradeQuery) -> Result<Page<Trade>> {
    if q.filter.emotional_states.is_some() {
        let trades = fetch_all(conn, user_id, &q.filter)?;
        return Ok(Page::slice(trades, q.page, q.limit));
    }

    let (clause, args) = where_clause(user_id, &q.filter);
    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM trades{}", clause),
        params_from_iter(args.iter()),
        |r| r.get(0),
    )?;
    let sql = format!(
        "SELECT {} FROM trades{}{} LIMIT {} OFFSET {}",
        COLUMNS,
        clause,
        ORDER,
        q.limit,
        q.offset().min(i64::MAX as usize)
    );
    let data = select(conn, &sql, &args)?;
    Ok(Page {
        data,
        pagination: crate::query::Pagination::new(q.page, q.limit, total.max(0) as usize),
    })
}
