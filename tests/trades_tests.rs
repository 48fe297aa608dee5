// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use uuid::Uuid;
use verotrade::error::Error;
use verotrade::models::{NewStrategy, NewTrade, Side, Trade, TradeUpdate};
use verotrade::query::{PnlFilter, TradeFilter, TradeQuery};
use verotrade::{cli, commands, db, store, views};

fn setup() -> (Connection, Uuid) {
    let conn = db::open_in_memory().unwrap();
    let user = store::users::create(&conn, "trader@example.com").unwrap();
    (conn, user.id)
}

fn add(conn: &Connection, user: Uuid, v: Value) -> Trade {
    let new: NewTrade = serde_json::from_value(v).unwrap();
    store::trades::create(conn, user, new).unwrap()
}

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn query(page: usize, limit: usize, filter: TradeFilter) -> TradeQuery {
    TradeQuery {
        page,
        limit,
        filter,
    }
}

#[test]
fn create_normalizes_and_derives_pnl() {
    let (conn, user) = setup();
    let t = add(
        &conn,
        user,
        json!({
            "symbol": " aapl ",
            "side": "buy",
            "quantity": "10",
            "entry_price": "100",
            "exit_price": "110.5",
            "trade_date": "2025-03-03",
            "entry_time": "09:30:00",
            "emotional_state": ["confident", "Patient", "confident"],
            "notes": "  "
        }),
    );
    assert_eq!(t.symbol, "AAPL");
    assert_eq!(t.market, "stock");
    assert_eq!(t.side, Side::Buy);
    assert_eq!(t.pnl, Some(d("105")));
    assert_eq!(t.emotional_state, vec!["CONFIDENT", "PATIENT"]);
    assert_eq!(t.notes, None);
    assert!(t.entry_time.is_some());

    let short = add(
        &conn,
        user,
        json!({
            "symbol": "TSLA",
            "market": "Stock",
            "side": "Sell",
            "quantity": "2",
            "entry_price": "100",
            "exit_price": "90",
            "trade_date": "2025-03-04"
        }),
    );
    assert_eq!(short.pnl, Some(d("20")));
    assert_eq!(short.market, "stock");
}

#[test]
fn explicit_pnl_is_kept() {
    let (conn, user) = setup();
    let t = add(
        &conn,
        user,
        json!({
            "symbol": "ES", "side": "Buy", "quantity": "1",
            "entry_price": "5000", "exit_price": "5010",
            "pnl": "-12.5", "trade_date": "2025-03-03"
        }),
    );
    assert_eq!(t.pnl, Some(d("-12.5")));
}

#[test]
fn create_rejects_bad_input() {
    let (conn, user) = setup();
    let zero: NewTrade = serde_json::from_value(json!({
        "symbol": "AAPL", "side": "Buy", "quantity": "0", "trade_date": "2025-03-03"
    }))
    .unwrap();
    assert!(matches!(
        store::trades::create(&conn, user, zero),
        Err(Error::Validation(_))
    ));

    let blank: NewTrade = serde_json::from_value(json!({
        "symbol": "  ", "side": "Buy", "quantity": "1", "trade_date": "2025-03-03"
    }))
    .unwrap();
    assert!(matches!(
        store::trades::create(&conn, user, blank),
        Err(Error::Validation(_))
    ));

    let stranger: NewTrade = serde_json::from_value(json!({
        "symbol": "AAPL", "side": "Buy", "quantity": "1", "trade_date": "2025-03-03",
        "strategy_id": Uuid::new_v4()
    }))
    .unwrap();
    assert!(matches!(
        store::trades::create(&conn, user, stranger),
        Err(Error::Validation(_))
    ));
}

#[test]
fn oversized_derived_pnl_is_rejected() {
    let (conn, user) = setup();
    let huge: NewTrade = serde_json::from_value(json!({
        "symbol": "BTCUSD", "side": "Buy", "quantity": "10000000000000000000000000000",
        "entry_price": "0", "exit_price": "10", "trade_date": "2025-03-03"
    }))
    .unwrap();
    assert!(matches!(
        store::trades::create(&conn, user, huge),
        Err(Error::Validation(_))
    ));

    let t = add(
        &conn,
        user,
        json!({
            "symbol": "BTCUSD", "side": "Sell", "quantity": "1",
            "entry_price": "10", "exit_price": "8", "trade_date": "2025-03-03"
        }),
    );
    let upd: TradeUpdate =
        serde_json::from_value(json!({ "quantity": "50000000000000000000000000000" })).unwrap();
    assert!(matches!(
        store::trades::update(&conn, user, t.id, upd),
        Err(Error::Validation(_))
    ));
    assert_eq!(store::trades::get(&conn, user, t.id).unwrap(), t);
}

#[test]
fn clearing_a_price_drops_only_derived_pnl() {
    let (conn, user) = setup();
    let derived = add(
        &conn,
        user,
        json!({
            "symbol": "ES", "side": "Buy", "quantity": "2",
            "entry_price": "100", "exit_price": "103", "trade_date": "2025-03-03"
        }),
    );
    assert_eq!(derived.pnl, Some(d("6")));
    let upd: TradeUpdate = serde_json::from_value(json!({ "exit_price": null })).unwrap();
    let u = store::trades::update(&conn, user, derived.id, upd).unwrap();
    assert_eq!(u.exit_price, None);
    assert_eq!(u.pnl, None);

    let manual = add(
        &conn,
        user,
        json!({
            "symbol": "ES", "side": "Buy", "quantity": "2", "pnl": "4.75",
            "entry_price": "100", "exit_price": "103", "trade_date": "2025-03-03"
        }),
    );
    let upd: TradeUpdate = serde_json::from_value(json!({ "exit_price": null })).unwrap();
    let u = store::trades::update(&conn, user, manual.id, upd).unwrap();
    assert_eq!(u.pnl, Some(d("4.75")));
}

#[test]
fn confluence_overview_follows_the_filter() {
    let (conn, user) = setup();
    add(
        &conn,
        user,
        json!({
            "symbol": "AAPL", "side": "Buy", "quantity": "1", "pnl": "500",
            "trade_date": "2025-03-01", "emotional_state": ["CONFIDENT"]
        }),
    );
    add(
        &conn,
        user,
        json!({
            "symbol": "AAPL", "side": "Sell", "quantity": "1", "pnl": "-300",
            "trade_date": "2025-03-02", "emotional_state": ["ANXIOUS", "CONFIDENT"]
        }),
    );

    let dash = views::dashboard(&conn, user).unwrap();
    let unfiltered = views::confluence(&conn, user, &TradeFilter::default()).unwrap();
    assert_eq!(unfiltered, dash);
    assert_eq!(dash.emotional_data[0].value, 2);

    let losers = TradeFilter {
        pnl: PnlFilter::Lossable,
        ..Default::default()
    };
    let filtered = views::confluence(&conn, user, &losers).unwrap();
    assert!(filtered.filters_active);
    assert_eq!(filtered.stats.total_trades, 1);
    assert_eq!(filtered.emotional_data.len(), 2);
    assert!(filtered.emotional_data.iter().all(|p| p.value == 1));
}

#[test]
fn update_is_partial_and_null_clears() {
    let (conn, user) = setup();
    let t = add(
        &conn,
        user,
        json!({
            "symbol": "NQ", "side": "Buy", "quantity": "2",
            "entry_price": "100", "exit_price": "105",
            "trade_date": "2025-03-03", "notes": "breakout",
            "emotional_state": "calm"
        }),
    );
    assert_eq!(t.pnl, Some(d("10")));

    let upd: TradeUpdate = serde_json::from_value(json!({ "notes": null })).unwrap();
    let u = store::trades::update(&conn, user, t.id, upd).unwrap();
    assert_eq!(u.notes, None);
    assert_eq!(u.symbol, "NQ");
    assert_eq!(u.emotional_state, vec!["CALM"]);
    assert_eq!(u.pnl, Some(d("10")));

    let upd: TradeUpdate = serde_json::from_value(json!({ "exit_price": "110" })).unwrap();
    let u = store::trades::update(&conn, user, t.id, upd).unwrap();
    assert_eq!(u.pnl, Some(d("20")));

    let upd: TradeUpdate =
        serde_json::from_value(json!({ "emotional_state": ["fomo", "Tilt"], "side": "Sell" }))
            .unwrap();
    let u = store::trades::update(&conn, user, t.id, upd).unwrap();
    assert_eq!(u.emotional_state, vec!["FOMO", "TILT"]);
    assert_eq!(u.pnl, Some(d("-20")));

    let same = store::trades::update(&conn, user, t.id, TradeUpdate::default()).unwrap();
    assert_eq!(same, u);
}

#[test]
fn trades_are_scoped_to_their_owner() {
    let (conn, user) = setup();
    let other = store::users::create(&conn, "other@example.com").unwrap().id;
    let t = add(
        &conn,
        user,
        json!({ "symbol": "AAPL", "side": "Buy", "quantity": "1", "trade_date": "2025-03-03" }),
    );

    assert!(matches!(
        store::trades::get(&conn, other, t.id),
        Err(Error::NotFound("Trade"))
    ));
    assert!(matches!(
        store::trades::update(&conn, other, t.id, TradeUpdate::default()),
        Err(Error::NotFound("Trade"))
    ));
    assert!(matches!(
        store::trades::delete(&conn, other, t.id),
        Err(Error::NotFound("Trade"))
    ));
    let page = store::trades::list(&conn, other, &query(1, 50, TradeFilter::default())).unwrap();
    assert!(page.data.is_empty());

    store::trades::delete(&conn, user, t.id).unwrap();
    assert!(matches!(
        store::trades::get(&conn, user, t.id),
        Err(Error::NotFound("Trade"))
    ));
}

#[test]
fn list_pages_newest_first() {
    let (conn, user) = setup();
    for day in 1..=25 {
        add(
            &conn,
            user,
            json!({
                "symbol": "SPY", "side": "Buy", "quantity": "1",
                "pnl": "1", "trade_date": format!("2025-01-{:02}", day)
            }),
        );
    }

    let page = store::trades::list(&conn, user, &query(2, 10, TradeFilter::default())).unwrap();
    assert_eq!(page.data.len(), 10);
    assert_eq!(page.data[0].trade_date.to_string(), "2025-01-15");
    let p = page.pagination;
    assert_eq!((p.current_page, p.limit, p.total_count, p.total_pages), (2, 10, 25, 3));
    assert!(p.has_previous_page);
    assert!(p.has_next_page);

    let last = store::trades::list(&conn, user, &query(3, 10, TradeFilter::default())).unwrap();
    assert_eq!(last.data.len(), 5);
    assert!(!last.pagination.has_next_page);

    let past = store::trades::list(&conn, user, &query(7, 10, TradeFilter::default())).unwrap();
    assert!(past.data.is_empty());
    assert_eq!(past.pagination.total_count, 25);
}

#[test]
fn filters_narrow_the_set() {
    let (conn, user) = setup();
    let rows = [
        ("AAPL", "stock", "Buy", "150", "2025-02-01", vec!["CONFIDENT"]),
        ("AAPL", "stock", "Sell", "-40", "2025-02-02", vec!["ANXIOUS"]),
        ("BTCUSD", "crypto", "Buy", "0", "2025-02-03", vec!["FOMO", "ANXIOUS"]),
        ("MSFT", "stock", "Sell", "75", "2025-02-10", vec![]),
    ];
    for (symbol, market, side, pnl, date, tags) in rows {
        add(
            &conn,
            user,
            json!({
                "symbol": symbol, "market": market, "side": side, "quantity": "1",
                "pnl": pnl, "trade_date": date, "emotional_state": tags
            }),
        );
    }
    let count = |f: TradeFilter| store::trades::fetch_all(&conn, user, &f).unwrap().len();

    assert_eq!(count(TradeFilter::default()), 4);
    assert_eq!(
        count(TradeFilter {
            pnl: PnlFilter::Profitable,
            ..Default::default()
        }),
        2
    );
    assert_eq!(
        count(TradeFilter {
            pnl: PnlFilter::Lossable,
            ..Default::default()
        }),
        1
    );
    assert_eq!(
        count(TradeFilter {
            symbol: Some("AP".into()),
            ..Default::default()
        }),
        2
    );
    assert_eq!(
        count(TradeFilter {
            market: Some("crypto".into()),
            ..Default::default()
        }),
        1
    );
    assert_eq!(
        count(TradeFilter {
            side: Some(Side::Sell),
            ..Default::default()
        }),
        2
    );
    assert_eq!(
        count(TradeFilter {
            date_from: Some("2025-02-02".parse().unwrap()),
            date_to: Some("2025-02-03".parse().unwrap()),
            ..Default::default()
        }),
        2
    );
    assert_eq!(
        count(TradeFilter {
            emotional_states: Some(vec!["ANXIOUS".into(), "CONFIDENT".into()]),
            ..Default::default()
        }),
        3
    );

    let page = store::trades::list(
        &conn,
        user,
        &query(
            2,
            2,
            TradeFilter {
                emotional_states: Some(vec!["ANXIOUS".into(), "CONFIDENT".into()]),
                ..Default::default()
            },
        ),
    )
    .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.pagination.total_count, 3);
    assert!(!page.pagination.has_next_page);
}

#[test]
fn unrecognized_emotion_filter_matches_nothing() {
    let (conn, user) = setup();
    add(
        &conn,
        user,
        json!({
            "symbol": "AAPL", "side": "Buy", "quantity": "1",
            "trade_date": "2025-03-03", "emotional_state": ["calm"]
        }),
    );
    let f = TradeFilter {
        emotional_states: Some(vec![]),
        ..Default::default()
    };
    assert!(store::trades::fetch_all(&conn, user, &f).unwrap().is_empty());
    let page = store::trades::list(&conn, user, &query(1, 10, f)).unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_count, 0);
}

#[test]
fn symbol_filter_treats_wildcards_literally() {
    let (conn, user) = setup();
    add(
        &conn,
        user,
        json!({ "symbol": "AAPL", "side": "Buy", "quantity": "1", "trade_date": "2025-03-03" }),
    );
    let f = TradeFilter {
        symbol: Some("%".into()),
        ..Default::default()
    };
    assert!(store::trades::fetch_all(&conn, user, &f).unwrap().is_empty());
}

#[test]
fn deleting_a_strategy_unlinks_its_trades() {
    let (conn, user) = setup();
    let s = store::strategies::create(
        &conn,
        user,
        NewStrategy {
            name: "Opening range".into(),
            description: None,
            is_active: None,
            rules: vec![],
        },
    )
    .unwrap();
    let t = add(
        &conn,
        user,
        json!({
            "symbol": "QQQ", "side": "Buy", "quantity": "1",
            "trade_date": "2025-03-03", "strategy_id": s.id
        }),
    );
    assert_eq!(t.strategy_id, Some(s.id));
    let by_strategy = TradeFilter {
        strategy_id: Some(s.id),
        ..Default::default()
    };
    assert_eq!(store::trades::fetch_all(&conn, user, &by_strategy).unwrap().len(), 1);

    store::strategies::delete(&conn, user, s.id).unwrap();
    let t = store::trades::get(&conn, user, t.id).unwrap();
    assert_eq!(t.strategy_id, None);
}

#[test]
fn cli_add_then_list() {
    let (conn, _) = setup();
    let m = cli::build_cli().get_matches_from([
        "verotrade",
        "trade",
        "add",
        "-u",
        "Trader@Example.com",
        "--symbol",
        "eurusd",
        "--market",
        "forex",
        "--side",
        "sell",
        "--quantity",
        "1000",
        "--date",
        "2025-04-01",
        "--pnl",
        "-35.20",
        "--entry-time",
        "14:05",
        "--emotions",
        "anxious, revenge",
    ]);
    let (_, trade_m) = m.subcommand().unwrap();
    commands::trades::handle(&conn, trade_m).unwrap();

    let m = cli::build_cli().get_matches_from([
        "verotrade",
        "trade",
        "list",
        "-u",
        "trader@example.com",
        "--pnl",
        "lossable",
        "--emotions",
        "REVENGE",
    ]);
    let (_, trade_m) = m.subcommand().unwrap();
    let (_, list_m) = trade_m.subcommand().unwrap();
    let page = commands::trades::query_page(&conn, list_m).unwrap();
    assert_eq!(page.data.len(), 1);
    let t = &page.data[0];
    assert_eq!(t.symbol, "EURUSD");
    assert_eq!(t.market, "forex");
    assert_eq!(t.side, Side::Sell);
    assert_eq!(t.pnl, Some(d("-35.20")));
    assert_eq!(t.emotional_state, vec!["ANXIOUS", "REVENGE"]);
    assert_eq!(t.entry_time.unwrap().to_string(), "14:05:00");
}
