// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::holdings::list_holdings;
use crate::commands::snapshots::list_history;
use anyhow::{Result, bail};
use chrono::SecondsFormat;
use rusqlite::Connection;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
}

fn parse_format(raw: &str) -> Result<Format> {
    match raw.trim().to_lowercase().as_str() {
        "csv" => Ok(Format::Csv),
        "json" => Ok(Format::Json),
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("holdings", sub)) => export_holdings(conn, sub),
        Some(("history", sub)) => export_history(conn, sub),
        _ => Ok(()),
    }
}

fn export_holdings(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = parse_format(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let holdings = list_holdings(conn)?;

    match fmt {
        Format::Csv => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "category", "label", "amount"])?;
            for h in &holdings {
                wtr.write_record([
                    h.id.to_string(),
                    h.category.to_string(),
                    h.label.clone(),
                    h.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            std::fs::write(out, serde_json::to_string_pretty(&holdings)?)?;
        }
    }
    info!(count = holdings.len(), out, "exported holdings");
    println!("Exported {} holdings to {}", holdings.len(), out);
    Ok(())
}

fn export_history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = parse_format(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap().trim();
    let history = list_history(conn, None)?;

    match fmt {
        Format::Csv => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "recorded_at",
                "grand_total",
                "nasdaq_total",
                "sp_total",
                "conservative_total",
                "cash_total",
            ])?;
            for s in &history {
                wtr.write_record([
                    s.id.to_string(),
                    s.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                    s.grand_total.to_string(),
                    s.nasdaq_total.to_string(),
                    s.sp_total.to_string(),
                    s.conservative_total.to_string(),
                    s.cash_total.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        Format::Json => {
            std::fs::write(out, serde_json::to_string_pretty(&history)?)?;
        }
    }
    info!(count = history.len(), out, "exported history");
    println!("Exported {} snapshots to {}", history.len(), out);
    Ok(())
}
