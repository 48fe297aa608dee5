// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Opaque bearer tokens. Only the SHA-256 digest is persisted.

use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};

const TOKEN_PREFIX: &str = "vt_";

pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

fn generate_token() -> String {
    format!(
        "{}{}{}",
        TOKEN_PREFIX,
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Issue a new token for `user_id` and return it in clear text.
pub fn issue_token(conn: &Connection, user_id: Uuid) -> Result<String> {
    let raw = generate_token();
    conn.execute(
        "INSERT INTO api_tokens(token_hash, user_id) VALUES (?1, ?2)",
        params![hash_token(&raw), user_id.to_string()],
    )?;
    Ok(raw)
}

pub fn revoke_tokens(conn: &Connection, user_id: Uuid) -> Result<usize> {
    let n = conn.execute(
        "UPDATE api_tokens SET revoked=1 WHERE user_id=?1 AND revoked=0",
        params![user_id.to_string()],
    )?;
    Ok(n)
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str> {
    let value = header
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Unauthorized("Missing authorization header".into()))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::Unauthorized("Malformed authorization header".into()))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(Error::Unauthorized("Expected a bearer token".into()));
    }
    Ok(token)
}

pub fn resolve_token(conn: &Connection, raw: &str) -> Result<Uuid> {
    let user: Option<String> = conn
        .query_row(
            "SELECT t.user_id FROM api_tokens t JOIN users u ON u.id=t.user_id
             WHERE t.token_hash=?1 AND t.revoked=0",
            params![hash_token(raw)],
            |r| r.get(0),
        )
        .optional()?;
    let user = user.ok_or_else(|| Error::Unauthorized("Invalid or revoked token".into()))?;
    Uuid::parse_str(&user).map_err(|e| Error::Internal(format!("corrupt user id: {}", e)))
}

/// Resolve the caller behind a raw `Authorization` header value.
pub fn authenticate(conn: &Connection, header: Option<&str>) -> Result<Uuid> {
    let token = bearer_token(header)?;
    resolve_token(conn, token)
}
