// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::emotions;
use crate::error::{Error, Result};
use crate::models::Side;
use crate::utils::parse_uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlFilter {
    #[default]
    All,
    Profitable,
    Lossable,
}

impl FromStr for PnlFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(PnlFilter::All),
            "profitable" => Ok(PnlFilter::Profitable),
            "lossable" => Ok(PnlFilter::Lossable),
            other => Err(Error::validation(format!(
                "Invalid pnlFilter '{}', expected all, profitable or lossable",
                other
            ))),
        }
    }
}

/// Raw query string, exactly as the client sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub emotional_states: Option<String>,
    pub strategy_id: Option<String>,
    pub symbol: Option<String>,
    pub market: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub pnl_filter: Option<String>,
    pub side: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    /// `Some` whenever the caller asked for an emotion filter, even if none
    /// of the requested tags survived normalization.
    pub emotional_states: Option<Vec<String>>,
    pub strategy_id: Option<Uuid>,
    pub symbol: Option<String>,
    pub market: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub pnl: PnlFilter,
    pub side: Option<Side>,
}

impl TradeFilter {
    pub fn is_active(&self) -> bool {
        *self != TradeFilter::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuery {
    pub page: usize,
    pub limit: usize,
    pub filter: TradeFilter,
}

impl TradeQuery {
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn from_params(p: TradeQueryParams, limits: PageLimits) -> Result<Self> {
        let page = non_blank(p.page.as_deref())
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = non_blank(p.limit.as_deref())
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(limits.default_limit)
            .clamp(1, limits.max_limit.max(1));

        let strategy_id = match non_blank(p.strategy_id.as_deref()) {
            Some(s) => Some(parse_uuid(s, "strategyId")?),
            None => None,
        };
        let date_from = non_blank(p.date_from.as_deref())
            .map(|s| parse_filter_date(s, "dateFrom"))
            .transpose()?;
        let date_to = non_blank(p.date_to.as_deref())
            .map(|s| parse_filter_date(s, "dateTo"))
            .transpose()?;
        if let (Some(from), Some(to)) = (date_from, date_to) {
            if from > to {
                return Err(Error::validation(format!(
                    "dateFrom {} is after dateTo {}",
                    from, to
                )));
            }
        }
        let pnl = match non_blank(p.pnl_filter.as_deref()) {
            Some(s) => s.parse()?,
            None => PnlFilter::All,
        };
        let side = match non_blank(p.side.as_deref()) {
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(s.parse::<Side>()?),
            None => None,
        };

        Ok(Self {
            page,
            limit,
            filter: TradeFilter {
                emotional_states: non_blank(p.emotional_states.as_deref())
                    .map(emotions::parse_filter_csv),
                strategy_id,
                symbol: non_blank(p.symbol.as_deref()).map(|s| s.to_uppercase()),
                market: non_blank(p.market.as_deref()).map(|s| s.to_lowercase()),
                date_from,
                date_to,
                pnl,
                side,
            },
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_filter_date(s: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        Error::validation(format!("Invalid {} '{}', expected YYYY-MM-DD", field, s))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub limit: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total_count: usize) -> Self {
        Self {
            current_page: page,
            limit,
            total_count,
            total_pages: total_count.div_ceil(limit.max(1)),
            has_next_page: page.saturating_mul(limit) < total_count,
            has_previous_page: page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Paginate an already-filtered, already-ordered list in memory.
    pub fn slice(mut items: Vec<T>, page: usize, limit: usize) -> Self {
        let total = items.len();
        let start = (page.max(1) - 1).saturating_mul(limit).min(total);
        let end = start.saturating_add(limit).min(total);
        let data: Vec<T> = items.drain(start..end).collect();
        Self {
            data,
            pagination: Pagination::new(page, limit, total),
        }
    }
}
