// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::{Query, State};

use super::AppState;
use super::extract::AuthUser;
use crate::error::Result;
use crate::models::Trade;
use crate::query::{Page, TradeQuery, TradeQueryParams};
use crate::store;
use crate::views::{self, Overview};

pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Overview>> {
    let out = state
        .with_conn(move |c| views::dashboard(c, user))
        .await?;
    Ok(Json(out))
}

pub async fn confluence_trades(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<TradeQueryParams>,
) -> Result<Json<Page<Trade>>> {
    let q = TradeQuery::from_params(params, state.config.page_limits)?;
    tracing::debug!(user = %user, page = q.page, limit = q.limit, "confluence trades");
    let page = state
        .with_conn(move |c| store::trades::list(c, user, &q))
        .await?;
    Ok(Json(page))
}

pub async fn confluence_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<TradeQueryParams>,
) -> Result<Json<Overview>> {
    let q = TradeQuery::from_params(params, state.config.page_limits)?;
    let out = state
        .with_conn(move |c| views::confluence(c, user, &q.filter))
        .await?;
    Ok(Json(out))
}
