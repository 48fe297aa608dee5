// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use crate::store::users;
use crate::utils::{id_for_user, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let user = users::create(conn, email)?;
            let token = auth::issue_token(conn, user.id)?;
            println!("Added user '{}' ({})", user.email, user.id);
            println!("Bearer token (shown once): {}", token);
        }
        Some(("token", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let id = id_for_user(conn, email)?;
            let token = auth::issue_token(conn, id)?;
            println!("Bearer token (shown once): {}", token);
        }
        Some(("revoke", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let id = id_for_user(conn, email)?;
            let n = auth::revoke_tokens(conn, id)?;
            println!("Revoked {} token(s) for '{}'", n, email);
        }
        Some(("list", _)) => {
            let data = users::list(conn)?
                .into_iter()
                .map(|(u, tokens)| vec![u.email, u.id.to_string(), tokens.to_string(), u.created_at])
                .collect();
            println!(
                "{}",
                pretty_table(&["Email", "ID", "Active tokens", "Created"], data)
            );
        }
        _ => {}
    }
    Ok(())
}
