// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{owner, query_from_matches};
use crate::utils::{maybe_print_json, pretty_table};
use crate::views::{self, Overview};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("emotions", sub)) => emotions(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("pnl", sub)) => pnl(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Same aggregate the confluence endpoint serves for these filters.
pub fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<Overview> {
    let user = owner(conn, sub)?;
    let q = query_from_matches(conn, user, sub)?;
    Ok(views::confluence(conn, user, &q.filter)?)
}

fn emotions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let radar = overview(conn, sub)?.emotional_data;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &radar)? {
        let scale = radar.first().map(|p| p.full_mark).unwrap_or(0);
        let rows = radar
            .into_iter()
            .map(|p| {
                vec![
                    p.subject,
                    p.value.to_string(),
                    p.buy_count.to_string(),
                    p.sell_count.to_string(),
                    format!("{:+.2}", p.leaning),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Emotion", "Trades", "Buy", "Sell", "Leaning"], rows)
        );
        println!("Radar scale: {}", scale);
    }
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = overview(conn, sub)?.stats;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec!["Trades".into(), s.total_trades.to_string()],
            vec!["Winning".into(), s.winning_trades.to_string()],
            vec!["Losing".into(), s.losing_trades.to_string()],
            vec!["Break-even".into(), s.break_even_trades.to_string()],
            vec!["Win rate %".into(), format!("{:.2}", s.win_rate)],
            vec!["Total P&L".into(), format!("{:.2}", s.total_pnl)],
            vec!["Average P&L".into(), format!("{:.2}", s.average_pnl)],
            vec![
                "Profit factor".into(),
                s.profit_factor
                    .map(|p| format!("{:.2}", p))
                    .unwrap_or_else(|| "-".into()),
            ],
            vec!["Largest win".into(), format!("{:.2}", s.largest_win)],
            vec!["Largest loss".into(), format!("{:.2}", s.largest_loss)],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn pnl(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let series = overview(conn, sub)?.pnl_series;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        let rows = series
            .into_iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    format!("{:.2}", p.pnl),
                    format!("{:.2}", p.cumulative),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "P&L", "Cumulative"], rows));
    }
    Ok(())
}
