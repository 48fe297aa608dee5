// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use super::col;
use crate::error::{Error, Result};
use crate::models::{NewStrategy, RuleUpdate, Strategy, StrategyRule, StrategyUpdate};

const COLUMNS: &str = "id, user_id, name, description, is_active, created_at";

fn map_strategy(r: &Row<'_>) -> rusqlite::Result<Strategy> {
    Ok(Strategy {
        id: col(r, 0)?,
        user_id: col(r, 1)?,
        name: r.get(2)?,
        description: r.get(3)?,
        is_active: r.get::<_, i64>(4)? != 0,
        created_at: r.get(5)?,
    })
}

fn map_rule(r: &Row<'_>) -> rusqlite::Result<StrategyRule> {
    Ok(StrategyRule {
        id: col(r, 0)?,
        strategy_id: col(r, 1)?,
        rule_text: r.get(2)?,
        is_checked: r.get::<_, i64>(3)? != 0,
    })
}

fn clean_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::validation("Strategy name is required"));
    }
    Ok(name.to_string())
}

fn clean_rule_text(raw: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(Error::validation("Rule text is required"));
    }
    Ok(text.to_string())
}

fn clean_description(raw: Option<String>) -> Option<String> {
    raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}

fn name_taken(conn: &Connection, user_id: Uuid, name: &str, except: Option<Uuid>) -> Result<bool> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM strategies WHERE user_id=?1 AND name=?2",
            params![user_id.to_string(), name],
            |r| r.get(0),
        )
        .optional()?;
    Ok(match (existing, except) {
        (Some(id), Some(skip)) => id != skip.to_string(),
        (Some(_), None) => true,
        (None, _) => false,
    })
}

pub fn create(conn: &Connection, user_id: Uuid, new: NewStrategy) -> Result<Strategy> {
    let name = clean_name(&new.name)?;
    if name_taken(conn, user_id, &name, None)? {
        return Err(Error::validation(format!("Strategy '{}' already exists", name)));
    }
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO strategies(id, user_id, name, description, is_active) VALUES (?1,?2,?3,?4,?5)",
        params![
            id.to_string(),
            user_id.to_string(),
            name,
            clean_description(new.description),
            new.is_active.unwrap_or(true) as i64
        ],
    )?;
    for text in new.rules {
        add_rule(conn, user_id, id, &text)?;
    }
    get(conn, user_id, id)
}

pub fn get(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<Strategy> {
    conn.query_row(
        &format!("SELECT {} FROM strategies WHERE id=?1 AND user_id=?2", COLUMNS),
        params![id.to_string(), user_id.to_string()],
        map_strategy,
    )
    .optional()?
    .ok_or(Error::NotFound("Strategy"))
}

pub fn list(conn: &Connection, user_id: Uuid) -> Result<Vec<Strategy>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM strategies WHERE user_id=?1 ORDER BY name",
        COLUMNS
    ))?;
    let rows = stmt.query_map(params![user_id.to_string()], map_strategy)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Reject strategy ids the caller does not own.
pub fn ensure_owned(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<()> {
    match get(conn, user_id, id) {
        Ok(_) => Ok(()),
        Err(Error::NotFound(_)) => Err(Error::validation(format!("Unknown strategy {}", id))),
        Err(e) => Err(e),
    }
}

pub fn update(conn: &Connection, user_id: Uuid, id: Uuid, upd: StrategyUpdate) -> Result<Strategy> {
    let mut current = get(conn, user_id, id)?;
    if let Some(name) = upd.name {
        let name = clean_name(&name)?;
        if name_taken(conn, user_id, &name, Some(id))? {
            return Err(Error::validation(format!("Strategy '{}' already exists", name)));
        }
        current.name = name;
    }
    if let Some(desc) = upd.description {
        current.description = clean_description(desc);
    }
    if let Some(active) = upd.is_active {
        current.is_active = active;
    }
    conn.execute(
        "UPDATE strategies SET name=?1, description=?2, is_active=?3 WHERE id=?4 AND user_id=?5",
        params![
            current.name,
            current.description,
            current.is_active as i64,
            id.to_string(),
            user_id.to_string()
        ],
    )?;
    Ok(current)
}

/// Deletes the strategy and its rules; trades keep their rows with the
/// strategy link cleared.
pub fn delete(conn: &Connection, user_id: Uuid, id: Uuid) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM strategies WHERE id=?1 AND user_id=?2",
        params![id.to_string(), user_id.to_string()],
    )?;
    if n == 0 {
        return Err(Error::NotFound("Strategy"));
    }
    Ok(())
}

pub fn list_rules(conn: &Connection, user_id: Uuid, strategy_id: Uuid) -> Result<Vec<StrategyRule>> {
    get(conn, user_id, strategy_id)?;
    let mut stmt = conn.prepare(
        "SELECT id, strategy_id, rule_text, is_checked FROM strategy_rules
         WHERE strategy_id=?1 ORDER BY created_at, rowid",
    )?;
    let rows = stmt.query_map(params![strategy_id.to_string()], map_rule)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn add_rule(conn: &Connection, user_id: Uuid, strategy_id: Uuid, text: &str) -> Result<StrategyRule> {
    get(conn, user_id, strategy_id)?;
    let text = clean_rule_text(text)?;
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO strategy_rules(id, strategy_id, rule_text) VALUES (?1,?2,?3)",
        params![id.to_string(), strategy_id.to_string(), text],
    )?;
    Ok(StrategyRule {
        id,
        strategy_id,
        rule_text: text,
        is_checked: false,
    })
}

fn get_rule(conn: &Connection, user_id: Uuid, strategy_id: Uuid, rule_id: Uuid) -> Result<StrategyRule> {
    conn.query_row(
        "SELECT r.id, r.strategy_id, r.rule_text, r.is_checked
         FROM strategy_rules r JOIN strategies s ON s.id=r.strategy_id
         WHERE r.id=?1 AND r.strategy_id=?2 AND s.user_id=?3",
        params![rule_id.to_string(), strategy_id.to_string(), user_id.to_string()],
        map_rule,
    )
    .optional()?
    .ok_or(Error::NotFound("Rule"))
}

/// Look a rule up by id alone, still scoped to the owner.
pub fn find_rule(conn: &Connection, user_id: Uuid, rule_id: Uuid) -> Result<StrategyRule> {
    conn.query_row(
        "SELECT r.id, r.strategy_id, r.rule_text, r.is_checked
         FROM strategy_rules r JOIN strategies s ON s.id=r.strategy_id
         WHERE r.id=?1 AND s.user_id=?2",
        params![rule_id.to_string(), user_id.to_string()],
        map_rule,
    )
    .optional()?
    .ok_or(Error::NotFound("Rule"))
}

pub fn update_rule(
    conn: &Connection,
    user_id: Uuid,
    strategy_id: Uuid,
    rule_id: Uuid,
    upd: RuleUpdate,
) -> Result<StrategyRule> {
    let mut rule = get_rule(conn, user_id, strategy_id, rule_id)?;
    if let Some(text) = upd.rule_text {
        rule.rule_text = clean_rule_text(&text)?;
    }
    if let Some(checked) = upd.is_checked {
        rule.is_checked = checked;
    }
    conn.execute(
        "UPDATE strategy_rules SET rule_text=?1, is_checked=?2 WHERE id=?3",
        params![rule.rule_text, rule.is_checked as i64, rule_id.to_string()],
    )?;
    Ok(rule)
}

pub fn delete_rule(conn: &Connection, user_id: Uuid, strategy_id: Uuid, rule_id: Uuid) -> Result<()> {
    get_rule(conn, user_id, strategy_id, rule_id)?;
    conn.execute(
        "DELETE FROM strategy_rules WHERE id=?1",
        params![rule_id.to_string()],
    )?;
    Ok(())
}
