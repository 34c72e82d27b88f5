// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use crate::db;

pub const DB_ENV: &str = "HOLDFAST_DB";
pub const LOG_ENV: &str = "HOLDFAST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// `--db` wins over `HOLDFAST_DB`, which wins over the platform data dir.
    pub fn resolve(m: &clap::ArgMatches) -> Result<Self> {
        Self::resolve_with(m, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(m: &clap::ArgMatches, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = match m.get_one::<String>("db").map(|s| s.trim()) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => match non_empty(DB_ENV) {
                Some(p) => PathBuf::from(p),
                None => db::default_db_path()?,
            },
        };
        let log_filter = non_empty(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Settings {
            db_path,
            log_filter,
        })
    }
}
