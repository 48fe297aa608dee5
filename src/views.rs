// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard and confluence aggregates, shared by the API and reports.

use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::emotions::{self, RadarPoint};
use crate::error::Result;
use crate::models::Trade;
use crate::query::TradeFilter;
use crate::stats::{self, PnlPoint, TradeStats};
use crate::store;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub stats: TradeStats,
    pub emotional_data: Vec<RadarPoint>,
    pub pnl_series: Vec<PnlPoint>,
    pub filters_active: bool,
}

impl Overview {
    pub fn from_trades(trades: &[Trade], filters_active: bool) -> Self {
        Self {
            stats: stats::compute(trades),
            emotional_data: emotions::aggregate(trades),
            pnl_series: stats::pnl_series(trades),
            filters_active,
        }
    }
}

/// Every trade the user owns, unfiltered.
pub fn dashboard(conn: &Connection, user: Uuid) -> Result<Overview> {
    let trades = store::trades::fetch_all(conn, user, &TradeFilter::default())?;
    Ok(Overview::from_trades(&trades, false))
}

/// The confluence view. With no active filter this is exactly [`dashboard`].
pub fn confluence(conn: &Connection, user: Uuid, filter: &TradeFilter) -> Result<Overview> {
    let filtered = store::trades::fetch_all(conn, user, filter)?;
    if filter.is_active() {
        return Ok(Overview::from_trades(&filtered, true));
    }
    let all = store::trades::fetch_all(conn, user, &TradeFilter::default())?;
    let source = emotions::radar_source(&all, &filtered, false);
    Ok(Overview::from_trades(source, false))
}
