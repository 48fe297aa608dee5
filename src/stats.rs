// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Trade;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub break_even_trades: usize,
    pub win_rate: Decimal,
    pub total_pnl: Decimal,
    pub average_pnl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_factor: Option<f64>,
    pub largest_win: Decimal,
    pub largest_loss: Decimal,
}

/// Sums saturate at the `Decimal` bounds instead of failing the whole view.
pub fn compute(trades: &[Trade]) -> TradeStats {
    let mut winning = 0;
    let mut losing = 0;
    let mut gross_profit = Decimal::ZERO;
    let mut gross_loss = Decimal::ZERO;
    let mut largest_win = Decimal::ZERO;
    let mut largest_loss = Decimal::ZERO;

    for pnl in trades.iter().filter_map(|t| t.pnl) {
        if pnl > Decimal::ZERO {
            winning += 1;
            gross_profit = gross_profit.saturating_add(pnl);
            largest_win = largest_win.max(pnl);
        } else if pnl < Decimal::ZERO {
            losing += 1;
            gross_loss = gross_loss.saturating_sub(pnl);
            largest_loss = largest_loss.min(pnl);
        }
    }

    let total = trades.len();
    let total_pnl = gross_profit - gross_loss;
    let (win_rate, average_pnl) = if total == 0 {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(total);
        (
            (Decimal::from(winning) * Decimal::ONE_HUNDRED / n).round_dp(2),
            total_pnl.checked_div(n).unwrap_or_default().round_dp(2),
        )
    };
    let profit_factor = if gross_loss.is_zero() {
        None
    } else {
        gross_profit
            .checked_div(gross_loss)
            .and_then(|pf| pf.round_dp(2).to_f64())
    };

    TradeStats {
        total_trades: total,
        winning_trades: winning,
        losing_trades: losing,
        break_even_trades: total - winning - losing,
        win_rate,
        total_pnl,
        average_pnl,
        gross_profit,
        gross_loss,
        profit_factor,
        largest_win,
        largest_loss,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlPoint {
    pub date: NaiveDate,
    pub pnl: Decimal,
    pub cumulative: Decimal,
}

/// Daily P&L in date order with a running total, for the dashboard chart.
pub fn pnl_series(trades: &[Trade]) -> Vec<PnlPoint> {
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in trades {
        let day = by_day.entry(t.trade_date).or_insert(Decimal::ZERO);
        *day = day.saturating_add(t.pnl.unwrap_or(Decimal::ZERO));
    }
    let mut running = Decimal::ZERO;
    by_day
        .into_iter()
        .map(|(date, pnl)| {
            running = running.saturating_add(pnl);
            PnlPoint {
                date,
                pnl,
                cumulative: running,
            }
        })
        .collect()
}
