// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use verotrade::emotions::{self, EmotionalStateInput, Leaning};
use verotrade::models::{Side, Trade};

fn trade(side: Side, pnl: i64, tags: &[&str]) -> Trade {
    Trade {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        symbol: "AAPL".into(),
        market: "stock".into(),
        side,
        quantity: Decimal::ONE,
        entry_price: None,
        exit_price: None,
        pnl: Some(Decimal::from(pnl)),
        trade_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        entry_time: None,
        exit_time: None,
        emotional_state: emotions::normalize_tags(tags.iter()),
        strategy_id: None,
        notes: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn input(v: serde_json::Value) -> Vec<String> {
    let parsed: Option<EmotionalStateInput> = serde_json::from_value(v).unwrap();
    emotions::from_input(parsed)
}

#[test]
fn accepts_every_input_shape() {
    assert!(input(json!(null)).is_empty());
    assert_eq!(input(json!(["Confident", " patient "])), vec!["CONFIDENT", "PATIENT"]);
    assert_eq!(input(json!("[\"fomo\",\"Tilt\"]")), vec!["FOMO", "TILT"]);
    assert_eq!(input(json!("calm, anxious")), vec!["CALM", "ANXIOUS"]);
}

#[test]
fn drops_empty_unrecognized_and_non_string_tags() {
    assert_eq!(
        input(json!(["", "   ", "CONFIDENT", 42, "!!!", "😀", null])),
        vec!["CONFIDENT"]
    );
    let too_long = "A".repeat(emotions::MAX_TAG_LEN + 1);
    assert!(emotions::normalize_tag(&too_long).is_none());
    assert!(input(json!("[not json")).is_empty());
}

#[test]
fn normalization_is_idempotent_and_dedupes() {
    let once = emotions::normalize_tags(["confident", "CONFIDENT", " Confident "]);
    assert_eq!(once, vec!["CONFIDENT"]);
    let twice = emotions::normalize_tags(once.iter());
    assert_eq!(once, twice);

    let stored = serde_json::to_string(&once).unwrap();
    assert_eq!(emotions::parse_stored(Some(&stored)), once);
}

#[test]
fn example_scenario_counts() {
    let trades = vec![
        trade(Side::Buy, 500, &["CONFIDENT"]),
        trade(Side::Sell, -300, &["ANXIOUS", "CONFIDENT"]),
    ];
    let radar = emotions::aggregate(&trades);
    assert_eq!(radar.len(), 2);
    assert_eq!(radar[0].subject, "CONFIDENT");
    assert_eq!(radar[0].value, 2);
    assert_eq!(radar[1].subject, "ANXIOUS");
    assert_eq!(radar[1].value, 1);
}

#[test]
fn counts_sum_to_tag_pairs() {
    let trades = vec![
        trade(Side::Buy, 1, &["Confident", "Patient"]),
        trade(Side::Buy, 1, &["patient"]),
        trade(Side::Sell, -1, &[]),
        trade(Side::Sell, 2, &["FOMO", "confident", "CONFIDENT"]),
    ];
    let pairs: usize = trades.iter().map(|t| t.emotional_state.len()).sum();
    let total: u64 = emotions::aggregate(&trades).iter().map(|p| p.value).sum();
    assert_eq!(total as usize, pairs);
    assert_eq!(pairs, 5);
}

#[test]
fn leaning_follows_sides() {
    let trades = vec![
        trade(Side::Buy, 1, &["GREEDY"]),
        trade(Side::Buy, 1, &["GREEDY"]),
        trade(Side::Buy, 1, &["GREEDY", "CALM"]),
        trade(Side::Sell, 1, &["GREEDY", "FEARFUL", "CALM"]),
    ];
    let radar = emotions::aggregate(&trades);
    let get = |s: &str| radar.iter().find(|p| p.subject == s).unwrap();

    let greedy = get("GREEDY");
    assert_eq!((greedy.buy_count, greedy.sell_count), (3, 1));
    assert!((greedy.leaning - 0.5).abs() < 1e-9);
    assert_eq!(greedy.leaning_type, Leaning::Buy);

    assert_eq!(get("FEARFUL").leaning_type, Leaning::Sell);
    assert_eq!(get("FEARFUL").leaning, -1.0);
    assert_eq!(get("CALM").leaning_type, Leaning::Balanced);
}

#[test]
fn full_mark_scales_with_max_and_has_floor() {
    assert_eq!(emotions::full_mark(0), 10);
    assert_eq!(emotions::full_mark(5), 10);
    assert_eq!(emotions::full_mark(10), 12);
    assert_eq!(emotions::full_mark(11), 14);

    let trades: Vec<Trade> = (0..20).map(|_| trade(Side::Buy, 1, &["CALM"])).collect();
    let radar = emotions::aggregate(&trades);
    assert_eq!(radar[0].full_mark, 24);
}

#[test]
fn radar_json_uses_chart_field_names() {
    let radar = emotions::aggregate(&[trade(Side::Sell, 1, &["TILT"])]);
    let v = serde_json::to_value(&radar[0]).unwrap();
    assert_eq!(v["subject"], "TILT");
    assert_eq!(v["value"], 1);
    assert_eq!(v["fullMark"], 10);
    assert_eq!(v["leaningType"], "Sell Leaning");
}

#[test]
fn unfiltered_radar_source_is_the_full_set() {
    let all = vec![
        trade(Side::Buy, 1, &["CALM"]),
        trade(Side::Sell, 1, &["ANXIOUS"]),
    ];
    let stale = vec![all[0].clone()];

    let src = emotions::radar_source(&all, &stale, false);
    assert_eq!(src.len(), 2);
    assert_eq!(emotions::aggregate(src), emotions::aggregate(&all));

    let src = emotions::radar_source(&all, &stale, true);
    assert_eq!(src.len(), 1);
}

#[test]
fn filter_matches_any_requested_tag() {
    let t = trade(Side::Buy, 1, &["CALM", "PATIENT"]);
    assert!(!emotions::matches_any(&t, &[]));
    assert!(emotions::matches_any(&t, &emotions::parse_filter_csv("fomo, patient")));
    assert!(!emotions::matches_any(&t, &emotions::parse_filter_csv("FOMO")));
}
