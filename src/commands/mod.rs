// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod users;
pub mod trades;
pub mod strategies;
pub mod reports;
pub mod exporter;
pub mod doctor;

use anyhow::Result;
use rusqlite::Connection;
use uuid::Uuid;

use crate::query::{PageLimits, TradeQuery, TradeQueryParams};
use crate::utils::{id_for_strategy, id_for_user};

pub(crate) fn owner(conn: &Connection, sub: &clap::ArgMatches) -> Result<Uuid> {
    id_for_user(conn, sub.get_one::<String>("user").unwrap())
}

/// Build a query from the shared filter flags, resolving `--strategy` by name.
pub fn query_from_matches(
    conn: &Connection,
    user: Uuid,
    sub: &clap::ArgMatches,
) -> Result<TradeQuery> {
    let opt = |k: &str| {
        sub.try_get_one::<String>(k)
            .ok()
            .flatten()
            .map(|s| s.to_string())
    };
    let num = |k: &str| {
        sub.try_get_one::<usize>(k)
            .ok()
            .flatten()
            .map(|n| n.to_string())
    };
    let strategy_id = match opt("strategy") {
        Some(name) => Some(id_for_strategy(conn, user, &name)?.to_string()),
        None => None,
    };
    let params = TradeQueryParams {
        page: num("page"),
        limit: num("limit"),
        emotional_states: opt("emotions"),
        strategy_id,
        symbol: opt("symbol"),
        market: opt("market"),
        date_from: opt("from"),
        date_to: opt("to"),
        pnl_filter: opt("pnl"),
        side: opt("side"),
    };
    Ok(TradeQuery::from_params(params, PageLimits::default())?)
}
