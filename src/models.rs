// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::emotions::EmotionalStateInput;
use crate::error::Error;

pub const DEFAULT_MARKET: &str = "stock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(alias = "buy", alias = "BUY")]
    Buy,
    #[serde(alias = "sell", alias = "SELL")]
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(Error::validation(format!(
                "Invalid side '{}', expected Buy or Sell",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symbol: String,
    pub market: String,
    pub side: Side,
    pub quantity: Decimal,
    pub entry_price: Option<Decimal>,
    pub exit_price: Option<Decimal>,
    pub pnl: Option<Decimal>,
    pub trade_date: NaiveDate,
    pub entry_time: Option<NaiveTime>,
    pub exit_time: Option<NaiveTime>,
    pub emotional_state: Vec<String>,
    pub strategy_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload of the trade-logging form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrade {
    pub symbol: String,
    #[serde(default)]
    pub market: Option<String>,
    pub side: Side,
    pub quantity: Decimal,
    #[serde(default)]
    pub entry_price: Option<Decimal>,
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    #[serde(default)]
    pub pnl: Option<Decimal>,
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub entry_time: Option<NaiveTime>,
    #[serde(default)]
    pub exit_time: Option<NaiveTime>,
    #[serde(default)]
    pub emotional_state: Option<EmotionalStateInput>,
    #[serde(default)]
    pub strategy_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update. Absent fields are left alone; `null` clears nullable ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeUpdate {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub entry_price: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub exit_price: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub pnl: Option<Option<Decimal>>,
    #[serde(default)]
    pub trade_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub entry_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "double_option")]
    pub exit_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "double_option")]
    pub emotional_state: Option<Option<EmotionalStateInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub strategy_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl TradeUpdate {
    pub fn is_empty(&self) -> bool {
        self.symbol.is_none()
            && self.market.is_none()
            && self.side.is_none()
            && self.quantity.is_none()
            && self.entry_price.is_none()
            && self.exit_price.is_none()
            && self.pnl.is_none()
            && self.trade_date.is_none()
            && self.entry_time.is_none()
            && self.exit_time.is_none()
            && self.emotional_state.is_none()
            && self.strategy_id.is_none()
            && self.notes.is_none()
    }
}

fn double_option<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

pub fn normalize_symbol(raw: &str) -> Result<String, Error> {
    let s = raw.trim().to_uppercase();
    if s.is_empty() {
        return Err(Error::validation("Symbol is required"));
    }
    Ok(s)
}

pub fn normalize_market(raw: Option<&str>) -> String {
    match raw.map(|m| m.trim().to_lowercase()) {
        Some(m) if !m.is_empty() => m,
        _ => DEFAULT_MARKET.to_string(),
    }
}

pub fn validate_quantity(q: Decimal) -> Result<Decimal, Error> {
    if q <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "Quantity must be positive, got {}",
            q
        )));
    }
    Ok(q)
}

/// P&L implied by the fill prices, when both are known.
pub fn derive_pnl(
    side: Side,
    quantity: Decimal,
    entry: Option<Decimal>,
    exit: Option<Decimal>,
) -> Result<Option<Decimal>, Error> {
    let (Some(entry), Some(exit)) = (entry, exit) else {
        return Ok(None);
    };
    let move_per_unit = match side {
        Side::Buy => exit.checked_sub(entry),
        Side::Sell => entry.checked_sub(exit),
    };
    move_per_unit
        .and_then(|m| m.checked_mul(quantity))
        .map(Some)
        .ok_or_else(|| Error::validation("P&L out of range"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStrategy {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRule {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub rule_text: String,
    pub is_checked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRule {
    pub rule_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleUpdate {
    #[serde(default)]
    pub rule_text: Option<String>,
    #[serde(default)]
    pub is_checked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: String,
}
