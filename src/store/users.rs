// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use super::col;
use crate::error::{Error, Result};
use crate::models::User;

pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(Error::validation(format!("Invalid email '{}'", raw.trim()))),
    }
}

pub fn create(conn: &Connection, email: &str) -> Result<User> {
    let email = normalize_email(email)?;
    if find_by_email(conn, &email)?.is_some() {
        return Err(Error::validation(format!("User '{}' already exists", email)));
    }
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users(id, email) VALUES (?1, ?2)",
        params![id.to_string(), email],
    )?;
    find_by_email(conn, &email)?.ok_or(Error::NotFound("User"))
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, email, created_at FROM users WHERE email=?1",
            params![email.trim().to_lowercase()],
            |r| {
                Ok(User {
                    id: col(r, 0)?,
                    email: r.get(1)?,
                    created_at: r.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn list(conn: &Connection) -> Result<Vec<(User, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.email, u.created_at,
                (SELECT COUNT(*) FROM api_tokens t WHERE t.user_id=u.id AND t.revoked=0)
         FROM users u ORDER BY u.email",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            User {
                id: col(r, 0)?,
                email: r.get(1)?,
                created_at: r.get(2)?,
            },
            r.get::<_, i64>(3)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
