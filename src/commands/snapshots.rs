// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::allocation::aggregate;
use crate::commands::holdings::list_holdings;
use crate::errors::LedgerError;
use crate::models::{Category, HistorySnapshot};
use crate::utils::{fmt_money, maybe_print_json, parse_stored_decimal, pretty_table};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, params};
use tracing::{debug, info};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("save", sub)) => save(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn save(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let snapshot = capture_snapshot(conn)?;
    if !maybe_print_json(sub.get_flag("json"), false, &snapshot)? {
        println!(
            "Saved snapshot #{} at {} (total {})",
            snapshot.id,
            snapshot.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            fmt_money(&snapshot.grand_total)
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let limit = sub.get_one::<usize>("limit").copied();
    let history = list_history(conn, limit)?;

    if !maybe_print_json(json_flag, jsonl_flag, &history)? {
        let rows = history.iter().map(snapshot_row).collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Recorded (UTC)", "Total", "Nasdaq", "S&P", "Conservative", "Cash"],
                rows
            )
        );
    }
    Ok(())
}

fn snapshot_row(s: &HistorySnapshot) -> Vec<String> {
    let mut row = vec![
        s.id.to_string(),
        s.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        fmt_money(&s.grand_total),
    ];
    for category in Category::ALL {
        let total = fmt_money(&s.total_for(category));
        row.push(match s.share(category) {
            Some(pct) => format!("{} ({:.1}%)", total, pct),
            None => total,
        });
    }
    row
}

/// Aggregates the current holdings and stores them as a new snapshot.
/// Fails with `LedgerError::NoHoldings`, writing nothing, when the store is
/// empty.
pub fn capture_snapshot(conn: &Connection) -> Result<HistorySnapshot> {
    capture_snapshot_at(conn, Utc::now())
}

pub(crate) fn capture_snapshot_at(
    conn: &Connection,
    now: DateTime<Utc>,
) -> Result<HistorySnapshot> {
    let holdings = list_holdings(conn)?;
    if holdings.is_empty() {
        return Err(LedgerError::NoHoldings.into());
    }
    let totals = aggregate(&holdings)?;
    // Stored text only keeps microseconds
    let recorded_at = now.trunc_subsecs(6);

    conn.execute(
        "INSERT INTO history_records(recorded_at, grand_total, nasdaq_total, sp_total, conservative_total, cash_total)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            totals.grand.to_string(),
            totals.nasdaq.to_string(),
            totals.sp.to_string(),
            totals.conservative.to_string(),
            totals.cash.to_string(),
        ],
    )
    .context("Failed to store history snapshot")?;
    let id = conn.last_insert_rowid();
    info!(id, holdings = holdings.len(), grand = %totals.grand, "snapshot captured");

    Ok(HistorySnapshot {
        id,
        recorded_at,
        grand_total: totals.grand,
        nasdaq_total: totals.nasdaq,
        sp_total: totals.sp,
        conservative_total: totals.conservative,
        cash_total: totals.cash,
    })
}

/// Newest first. Snapshots sharing a timestamp come back newest id first.
pub fn list_history(conn: &Connection, limit: Option<usize>) -> Result<Vec<HistorySnapshot>> {
    let mut sql = String::from(
        "SELECT id, recorded_at, grand_total, nasdaq_total, sp_total, conservative_total, cash_total
         FROM history_records ORDER BY recorded_at DESC, id DESC",
    );
    if limit.is_some() {
        sql.push_str(" LIMIT ?1");
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match limit {
        Some(n) => stmt.query(params![i64::try_from(n).unwrap_or(i64::MAX)])?,
        None => stmt.query([])?,
    };

    let mut history = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let recorded_s: String = r.get(1)?;
        let recorded_at = DateTime::parse_from_rfc3339(&recorded_s)
            .with_context(|| format!("Invalid recorded_at '{}' on snapshot #{}", recorded_s, id))?
            .with_timezone(&Utc);
        let total = |idx: usize, what: &str| -> Result<rust_decimal::Decimal> {
            let s: String = r.get(idx)?;
            parse_stored_decimal(&s, what)
                .with_context(|| format!("Snapshot #{} has an unreadable {}", id, what))
        };
        history.push(HistorySnapshot {
            id,
            recorded_at,
            grand_total: total(2, "grand_total")?,
            nasdaq_total: total(3, "nasdaq_total")?,
            sp_total: total(4, "sp_total")?,
            conservative_total: total(5, "conservative_total")?,
            cash_total: total(6, "cash_total")?,
        });
    }
    debug!(count = history.len(), "listed history");
    Ok(history)
}
