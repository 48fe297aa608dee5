// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::extract::rejection::JsonRejection;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use super::AppState;
use crate::auth;
use crate::error::{Error, Result};
use crate::utils::parse_uuid;

/// The authenticated caller. Every owner-scoped query takes this id.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let user = state
            .with_conn(move |c| auth::authenticate(c, header.as_deref()))
            .await?;
        Ok(AuthUser(user))
    }
}

/// Unwrap a JSON body, reporting malformed payloads through [`Error`].
pub fn body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| Error::validation(e.body_text()))
}

pub fn path_id(raw: &str, what: &str) -> Result<Uuid> {
    parse_uuid(raw, what)
}
