// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Emotional-state tags: parsing, normalization, and radar aggregation.
//!
//! Every view that counts emotions (dashboard, confluence, reports) goes
//! through [`aggregate`]. Raw input is normalized once, at the boundary, by
//! [`EmotionalStateInput::into_tags`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::models::{Side, Trade};

pub const MAX_TAG_LEN: usize = 32;
pub const MIN_FULL_MARK: u64 = 10;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9 _-]*$").unwrap());

/// The shapes `emotional_state` arrives in: an array, or a string holding
/// either a JSON array or a comma-separated list. `null` is `Option::None`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EmotionalStateInput {
    Tags(Vec<Value>),
    Text(String),
}

impl EmotionalStateInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            EmotionalStateInput::Tags(items) => normalize_tags(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string)),
            ),
            EmotionalStateInput::Text(s) => parse_text(&s),
        }
    }
}

fn parse_text(s: &str) -> Vec<String> {
    let trimmed = s.trim();
    if trimmed.starts_with('[') {
        return match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(items) => EmotionalStateInput::Tags(items).into_tags(),
            Err(_) => Vec::new(),
        };
    }
    normalize_tags(trimmed.split(',').map(str::to_string))
}

/// Normalize a stored or user-supplied value; malformed input yields no tags.
pub fn parse_stored(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) => parse_text(s),
        None => Vec::new(),
    }
}

pub fn from_input(input: Option<EmotionalStateInput>) -> Vec<String> {
    input.map(EmotionalStateInput::into_tags).unwrap_or_default()
}

/// Trim and upper-case; `None` for empty or unrecognized tags.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().to_uppercase();
    if tag.is_empty() || tag.len() > MAX_TAG_LEN || !TAG_RE.is_match(&tag) {
        return None;
    }
    Some(tag)
}

/// Normalized, de-duplicated tags in first-seen order.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in raw {
        if let Some(tag) = normalize_tag(item.as_ref()) {
            if seen.insert(tag.clone()) {
                out.push(tag);
            }
        }
    }
    out
}

/// Parse a CSV filter value (`?emotionalStates=confident,fomo`).
pub fn parse_filter_csv(csv: &str) -> Vec<String> {
    normalize_tags(csv.split(','))
}

/// True when the trade carries at least one of `wanted`. An empty `wanted`
/// matches nothing.
pub fn matches_any(trade: &Trade, wanted: &[String]) -> bool {
    trade.emotional_state.iter().any(|t| wanted.contains(t))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Leaning {
    #[serde(rename = "Buy Leaning")]
    Buy,
    #[serde(rename = "Sell Leaning")]
    Sell,
    #[serde(rename = "Balanced")]
    Balanced,
}

/// One axis of the emotion radar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub subject: String,
    pub value: u64,
    pub buy_count: u64,
    pub sell_count: u64,
    pub leaning: f64,
    pub leaning_type: Leaning,
    pub full_mark: u64,
}

#[derive(Default)]
struct Tally {
    total: u64,
    buys: u64,
    sells: u64,
}

pub fn aggregate(trades: &[Trade]) -> Vec<RadarPoint> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for trade in trades {
        for tag in &trade.emotional_state {
            let t = tallies.entry(tag.as_str()).or_default();
            t.total += 1;
            match trade.side {
                Side::Buy => t.buys += 1,
                Side::Sell => t.sells += 1,
            }
        }
    }

    let max = tallies.values().map(|t| t.total).max().unwrap_or(0);
    let full_mark = full_mark(max);

    let mut points: Vec<RadarPoint> = tallies
        .into_iter()
        .map(|(subject, t)| {
            let directional = t.buys + t.sells;
            let leaning = if directional == 0 {
                0.0
            } else {
                (t.buys as f64 - t.sells as f64) / directional as f64
            };
            let leaning_type = if leaning > 0.0 {
                Leaning::Buy
            } else if leaning < 0.0 {
                Leaning::Sell
            } else {
                Leaning::Balanced
            };
            RadarPoint {
                subject: subject.to_string(),
                value: t.total,
                buy_count: t.buys,
                sell_count: t.sells,
                leaning,
                leaning_type,
                full_mark,
            }
        })
        .collect();
    points.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.subject.cmp(&b.subject)));
    points
}

/// Radar scale: 1.2x the busiest axis, never below [`MIN_FULL_MARK`].
pub fn full_mark(max_count: u64) -> u64 {
    let scaled = (max_count * 12).div_ceil(10);
    scaled.max(MIN_FULL_MARK)
}

/// Pick the trade set the radar is computed from. Without active filters
/// this is always `all`, so the confluence radar matches the dashboard.
pub fn radar_source<'a>(all: &'a [Trade], filtered: &'a [Trade], filters_active: bool) -> &'a [Trade] {
    if filters_active {
        return filtered;
    }
    if filtered.len() != all.len() {
        tracing::warn!(
            all = all.len(),
            filtered = filtered.len(),
            "unfiltered trade set diverged, recomputing radar from all trades"
        );
    }
    all
}
