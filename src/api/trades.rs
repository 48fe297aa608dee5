// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::AppState;
use super::extract::{AuthUser, body, path_id};
use crate::error::Result;
use crate::models::{NewTrade, Trade, TradeUpdate};
use crate::query::{Page, TradeQuery, TradeQueryParams};
use crate::store;

pub async fn list_trades(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<TradeQueryParams>,
) -> Result<Json<Page<Trade>>> {
    let q = TradeQuery::from_params(params, state.config.page_limits)?;
    let page = state
        .with_conn(move |c| store::trades::list(c, user, &q))
        .await?;
    Ok(Json(page))
}

pub async fn create_trade(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: std::result::Result<Json<NewTrade>, JsonRejection>,
) -> Result<(StatusCode, Json<Trade>)> {
    let new = body(payload)?;
    let trade = state
        .with_conn(move |c| store::trades::create(c, user, new))
        .await?;
    Ok((StatusCode::CREATED, Json(trade)))
}

pub async fn get_trade(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Trade>> {
    let id = path_id(&id, "trade ID")?;
    let trade = state
        .with_conn(move |c| store::trades::get(c, user, id))
        .await?;
    Ok(Json(trade))
}

pub async fn update_trade(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TradeUpdate>, JsonRejection>,
) -> Result<Json<Trade>> {
    let id = path_id(&id, "trade ID")?;
    let upd = body(payload)?;
    let trade = state
        .with_conn(move |c| store::trades::update(c, user, id, upd))
        .await?;
    Ok(Json(trade))
}

pub async fn delete_trade(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = path_id(&id, "trade ID")?;
    state
        .with_conn(move |c| store::trades::delete(c, user, id))
        .await?;
    Ok(Json(json!({ "success": true, "id": id })))
}
