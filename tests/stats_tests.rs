// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;
use verotrade::models::{Side, Trade};
use verotrade::stats;

fn trade(day: u32, pnl: Option<&str>) -> Trade {
    Trade {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        symbol: "ES".into(),
        market: "futures".into(),
        side: Side::Buy,
        quantity: Decimal::ONE,
        entry_price: None,
        exit_price: None,
        pnl: pnl.map(|p| Decimal::from_str(p).unwrap()),
        trade_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        entry_time: None,
        exit_time: None,
        emotional_state: vec![],
        strategy_id: None,
        notes: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn empty_set_is_all_zero() {
    let s = stats::compute(&[]);
    assert_eq!(s.total_trades, 0);
    assert_eq!(s.win_rate, Decimal::ZERO);
    assert_eq!(s.average_pnl, Decimal::ZERO);
    assert_eq!(s.profit_factor, None);
}

#[test]
fn wins_losses_and_break_even() {
    let trades = vec![
        trade(1, Some("500")),
        trade(2, Some("-300")),
        trade(3, Some("100")),
        trade(4, Some("0")),
        trade(5, None),
    ];
    let s = stats::compute(&trades);
    assert_eq!(s.total_trades, 5);
    assert_eq!(s.winning_trades, 2);
    assert_eq!(s.losing_trades, 1);
    assert_eq!(s.break_even_trades, 2);
    assert_eq!(s.win_rate, d("40"));
    assert_eq!(s.total_pnl, d("300"));
    assert_eq!(s.average_pnl, d("60"));
    assert_eq!(s.gross_profit, d("600"));
    assert_eq!(s.gross_loss, d("300"));
    assert_eq!(s.profit_factor, Some(2.0));
    assert_eq!(s.largest_win, d("500"));
    assert_eq!(s.largest_loss, d("-300"));
}

#[test]
fn pnl_series_groups_by_day_with_running_total() {
    let trades = vec![
        trade(3, Some("50")),
        trade(1, Some("100")),
        trade(1, Some("-40")),
        trade(2, None),
    ];
    let series = stats::pnl_series(&trades);
    let got: Vec<(u32, Decimal, Decimal)> = series
        .iter()
        .map(|p| (chrono::Datelike::day(&p.date), p.pnl, p.cumulative))
        .collect();
    assert_eq!(
        got,
        vec![
            (1, d("60"), d("60")),
            (2, d("0"), d("60")),
            (3, d("50"), d("110")),
        ]
    );
}

#[test]
fn extreme_pnl_saturates_instead_of_failing() {
    let big = "70000000000000000000000000000";
    let neg = format!("-{}", big);
    let trades = vec![
        trade(1, Some(big)),
        trade(1, Some(big)),
        trade(2, Some(neg.as_str())),
        trade(2, Some(neg.as_str())),
    ];
    let s = stats::compute(&trades);
    assert_eq!(s.total_trades, 4);
    assert_eq!(s.gross_profit, Decimal::MAX);
    assert_eq!(s.gross_loss, Decimal::MAX);
    assert_eq!(s.total_pnl, Decimal::ZERO);
    assert_eq!(s.profit_factor, Some(1.0));
    assert_eq!(s.largest_win, d(big));

    let series = stats::pnl_series(&trades);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].pnl, Decimal::MAX);
    assert_eq!(series[1].pnl, Decimal::MIN);
    assert_eq!(series[1].cumulative, Decimal::ZERO);
}
