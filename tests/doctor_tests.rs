// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use uuid::Uuid;
use verotrade::commands::doctor;
use verotrade::models::NewTrade;
use verotrade::{db, store};

fn setup() -> (Connection, Uuid) {
    let conn = db::open_in_memory().unwrap();
    let user = store::users::create(&conn, "trader@example.com").unwrap();
    (conn, user.id)
}

#[test]
fn clean_journal_has_no_findings() {
    let (conn, user) = setup();
    let new: NewTrade = serde_json::from_value(serde_json::json!({
        "symbol": "AAPL", "side": "Buy", "quantity": "1", "pnl": "3",
        "trade_date": "2025-03-03", "emotional_state": "calm, fomo"
    }))
    .unwrap();
    store::trades::create(&conn, user, new).unwrap();
    assert!(doctor::findings(&conn).unwrap().is_empty());
}

#[test]
fn flags_raw_rows_written_outside_the_store() {
    let (conn, user) = setup();
    let other = store::users::create(&conn, "other@example.com").unwrap().id;
    let foreign_strategy = Uuid::new_v4();
    conn.execute(
        "INSERT INTO strategies(id, user_id, name) VALUES (?1, ?2, 'Theirs')",
        params![foreign_strategy.to_string(), other.to_string()],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO trades(id, user_id, symbol, market, side, quantity, pnl, trade_date, emotional_state, strategy_id)
         VALUES ('t1', ?1, 'AAPL', ' ', 'Buy', 'ten', 'n/a', '2025-03-03', '[\"calm\", \"CALM\"]', ?2)",
        params![user.to_string(), foreign_strategy.to_string()],
    )
    .unwrap();

    let issues: Vec<String> = doctor::findings(&conn)
        .unwrap()
        .into_iter()
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(
        issues,
        vec![
            "trade_missing_market",
            "emotional_state_not_normalized",
            "strategy_owner_mismatch",
            "bad_quantity",
            "bad_pnl",
        ]
    );
}
