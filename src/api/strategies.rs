// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::AppState;
use super::extract::{AuthUser, body, path_id};
use crate::error::Result;
use crate::models::{NewRule, NewStrategy, RuleUpdate, Strategy, StrategyRule, StrategyUpdate};
use crate::query::TradeFilter;
use crate::stats::{self, TradeStats};
use crate::store;

#[derive(Debug, Clone, Serialize)]
pub struct StrategyDetail {
    #[serde(flatten)]
    pub strategy: Strategy,
    pub rules: Vec<StrategyRule>,
    pub stats: TradeStats,
}

fn detail(conn: &Connection, user: Uuid, id: Uuid) -> Result<StrategyDetail> {
    let strategy = store::strategies::get(conn, user, id)?;
    let rules = store::strategies::list_rules(conn, user, id)?;
    let filter = TradeFilter {
        strategy_id: Some(id),
        ..TradeFilter::default()
    };
    let trades = store::trades::fetch_all(conn, user, &filter)?;
    Ok(StrategyDetail {
        strategy,
        rules,
        stats: stats::compute(&trades),
    })
}

pub async fn list_strategies(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Strategy>>> {
    let out = state
        .with_conn(move |c| store::strategies::list(c, user))
        .await?;
    Ok(Json(out))
}

pub async fn create_strategy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: std::result::Result<Json<NewStrategy>, JsonRejection>,
) -> Result<(StatusCode, Json<StrategyDetail>)> {
    let new = body(payload)?;
    let out = state
        .with_conn(move |c| {
            let s = store::strategies::create(c, user, new)?;
            detail(c, user, s.id)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(out)))
}

pub async fn get_strategy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<StrategyDetail>> {
    let id = path_id(&id, "strategy ID")?;
    let out = state.with_conn(move |c| detail(c, user, id)).await?;
    Ok(Json(out))
}

pub async fn update_strategy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StrategyUpdate>, JsonRejection>,
) -> Result<Json<Strategy>> {
    let id = path_id(&id, "strategy ID")?;
    let upd = body(payload)?;
    let out = state
        .with_conn(move |c| store::strategies::update(c, user, id, upd))
        .await?;
    Ok(Json(out))
}

pub async fn delete_strategy(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = path_id(&id, "strategy ID")?;
    state
        .with_conn(move |c| store::strategies::delete(c, user, id))
        .await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn list_rules(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<StrategyRule>>> {
    let id = path_id(&id, "strategy ID")?;
    let out = state
        .with_conn(move |c| store::strategies::list_rules(c, user, id))
        .await?;
    Ok(Json(out))
}

pub async fn add_rule(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<NewRule>, JsonRejection>,
) -> Result<(StatusCode, Json<StrategyRule>)> {
    let id = path_id(&id, "strategy ID")?;
    let new = body(payload)?;
    let out = state
        .with_conn(move |c| store::strategies::add_rule(c, user, id, &new.rule_text))
        .await?;
    Ok((StatusCode::CREATED, Json(out)))
}

pub async fn update_rule(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, rule_id)): Path<(String, String)>,
    payload: std::result::Result<Json<RuleUpdate>, JsonRejection>,
) -> Result<Json<StrategyRule>> {
    let id = path_id(&id, "strategy ID")?;
    let rule_id = path_id(&rule_id, "rule ID")?;
    let upd = body(payload)?;
    let out = state
        .with_conn(move |c| store::strategies::update_rule(c, user, id, rule_id, upd))
        .await?;
    Ok(Json(out))
}

pub async fn delete_rule(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((id, rule_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    let id = path_id(&id, "strategy ID")?;
    let rule_id = path_id(&rule_id, "rule ID")?;
    state
        .with_conn(move |c| store::strategies::delete_rule(c, user, id, rule_id))
        .await?;
    Ok(Json(json!({ "success": true, "id": rule_id })))
}
