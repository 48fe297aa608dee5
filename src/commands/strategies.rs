// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::owner;
use crate::models::{NewStrategy, RuleUpdate};
use crate::store::strategies;
use crate::utils::{id_for_strategy, parse_uuid, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user = owner(conn, sub)?;
            let new = NewStrategy {
                name: sub.get_one::<String>("name").unwrap().to_string(),
                description: sub.get_one::<String>("description").cloned(),
                is_active: None,
                rules: sub
                    .get_many::<String>("rule")
                    .map(|v| v.cloned().collect())
                    .unwrap_or_default(),
            };
            let s = strategies::create(conn, user, new)?;
            println!("Added strategy '{}' ({})", s.name, s.id);
        }
        Some(("list", sub)) => {
            let user = owner(conn, sub)?;
            let mut data = Vec::new();
            for s in strategies::list(conn, user)? {
                let rules = strategies::list_rules(conn, user, s.id)?;
                let checked = rules.iter().filter(|r| r.is_checked).count();
                data.push(vec![
                    s.name,
                    s.description.unwrap_or_default(),
                    if s.is_active { "yes".into() } else { "no".into() },
                    format!("{}/{}", checked, rules.len()),
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Strategy", "Description", "Active", "Rules checked"], data)
            );
        }
        Some(("rm", sub)) => {
            let user = owner(conn, sub)?;
            let name = sub.get_one::<String>("name").unwrap();
            let id = id_for_strategy(conn, user, name)?;
            strategies::delete(conn, user, id)?;
            println!("Removed strategy '{}'", name);
        }
        Some(("rule-add", sub)) => {
            let user = owner(conn, sub)?;
            let id = id_for_strategy(conn, user, sub.get_one::<String>("strategy").unwrap())?;
            let rule = strategies::add_rule(conn, user, id, sub.get_one::<String>("text").unwrap())?;
            println!("Added rule {}: {}", rule.id, rule.rule_text);
        }
        Some(("rules", sub)) => {
            let user = owner(conn, sub)?;
            let id = id_for_strategy(conn, user, sub.get_one::<String>("strategy").unwrap())?;
            let data = strategies::list_rules(conn, user, id)?
                .into_iter()
                .map(|r| {
                    vec![
                        if r.is_checked { "[x]".into() } else { "[ ]".into() },
                        r.rule_text,
                        r.id.to_string(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["", "Rule", "ID"], data));
        }
        Some(("check", sub)) => {
            let user = owner(conn, sub)?;
            let rule_id = parse_uuid(sub.get_one::<String>("rule").unwrap(), "rule ID")?;
            let rule = strategies::find_rule(conn, user, rule_id)?;
            let checked = !sub.get_flag("uncheck");
            let rule = strategies::update_rule(
                conn,
                user,
                rule.strategy_id,
                rule_id,
                RuleUpdate {
                    rule_text: None,
                    is_checked: Some(checked),
                },
            )?;
            println!(
                "{} rule '{}'",
                if rule.is_checked { "Checked" } else { "Unchecked" },
                rule.rule_text
            );
        }
        _ => {}
    }
    Ok(())
}
