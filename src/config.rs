// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::query::PageLimits;

pub const DEFAULT_LOG_FILTER: &str = "verotrade=info,tower_http=info";

#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit database file; `None` means the platform data dir.
    pub database_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub page_limits: PageLimits,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            page_limits: PageLimits::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Read `VEROTRADE_*` and `RUST_LOG`, after loading `.env` when present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(p) = get("VEROTRADE_DB") {
            cfg.database_path = Some(PathBuf::from(p));
        }
        if let Some(b) = get("VEROTRADE_BIND") {
            cfg.bind_addr = parse_bind(&b)?;
        }
        if let Some(v) = get("VEROTRADE_PAGE_SIZE") {
            cfg.page_limits.default_limit = parse_size("VEROTRADE_PAGE_SIZE", &v)?;
        }
        if let Some(v) = get("VEROTRADE_MAX_PAGE_SIZE") {
            cfg.page_limits.max_limit = parse_size("VEROTRADE_MAX_PAGE_SIZE", &v)?;
        }
        if cfg.page_limits.default_limit > cfg.page_limits.max_limit {
            return Err(anyhow!(
                "VEROTRADE_PAGE_SIZE ({}) exceeds VEROTRADE_MAX_PAGE_SIZE ({})",
                cfg.page_limits.default_limit,
                cfg.page_limits.max_limit
            ));
        }
        if let Some(f) = get("RUST_LOG") {
            cfg.log_filter = f;
        }
        Ok(cfg)
    }
}

pub fn parse_bind(s: &str) -> Result<SocketAddr> {
    s.trim()
        .parse::<SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}', expected HOST:PORT", s))
}

fn parse_size(key: &str, v: &str) -> Result<usize> {
    let n: usize = v
        .parse()
        .with_context(|| format!("{} must be a positive integer, got '{}'", key, v))?;
    if n == 0 {
        return Err(anyhow!("{} must be at least 1", key));
    }
    Ok(n)
}
