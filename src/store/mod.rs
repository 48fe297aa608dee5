// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite persistence. Every trade and strategy query is scoped by owner.

pub mod strategies;
pub mod trades;
pub mod users;

use rusqlite::Row;
use rusqlite::types::Type;
use std::str::FromStr;

pub(crate) fn now_ts() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}

/// Parse a TEXT column through `FromStr`.
pub(crate) fn col<T>(r: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let s: String = r.get(idx)?;
    s.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn opt_col<T>(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let s: Option<String> = r.get(idx)?;
    match s.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

pub(crate) fn opt_string<T: ToString>(v: Option<T>) -> Option<String> {
    v.map(|x| x.to_string())
}
