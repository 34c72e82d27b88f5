// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::allocation::round2;
use crate::models::{Category, Holding};
use crate::utils::{
    fmt_money, maybe_print_json, parse_category, parse_decimal, parse_stored_decimal,
    pretty_table,
};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

/// Amounts are stored as decimal(19,2): at most 17 integer digits.
const MAX_STORED_AMOUNT: Decimal = dec!(100000000000000000);

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = parse_category(sub.get_one::<String>("category").unwrap().trim())?;
    let label = sub.get_one::<String>("label").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;

    let holding = add_holding(conn, category, &label, amount)?;
    println!(
        "Added holding #{} {} '{}' = {}",
        holding.id,
        holding.category,
        holding.label,
        fmt_money(&holding.amount)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let holdings = match sub.get_one::<String>("category") {
        Some(raw) => list_by_category(conn, parse_category(raw.trim())?)?,
        None => list_holdings(conn)?,
    };

    if !maybe_print_json(json_flag, jsonl_flag, &holdings)? {
        let rows = holdings
            .iter()
            .map(|h| {
                vec![
                    h.id.to_string(),
                    h.category.to_string(),
                    h.label.clone(),
                    fmt_money(&h.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Category", "Label", "Amount"], rows)
        );
    }
    Ok(())
}

/// Stores a new holding and returns it with its assigned id. The amount is
/// fixed at two places on the way in and must fit decimal(19,2); sign and
/// label are not checked.
pub fn add_holding(
    conn: &Connection,
    category: Category,
    label: &str,
    amount: Decimal,
) -> Result<Holding> {
    let amount = round2(amount);
    if amount.abs() >= MAX_STORED_AMOUNT {
        bail!(
            "Amount {} for '{}' is out of range (at most 17 integer digits)",
            amount,
            label
        );
    }
    conn.execute(
        "INSERT INTO holdings(category, label, amount) VALUES (?1, ?2, ?3)",
        params![category.as_str(), label, amount.to_string()],
    )
    .with_context(|| format!("Failed to store {} holding '{}'", category, label))?;
    let id = conn.last_insert_rowid();
    info!(id, %category, %amount, "holding added");
    Ok(Holding {
        id,
        category,
        label: label.to_string(),
        amount,
    })
}

/// Every holding in insertion order.
pub fn list_holdings(conn: &Connection) -> Result<Vec<Holding>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, category, label, amount FROM holdings ORDER BY id")?;
    let holdings = collect_holdings(&mut stmt, params![])?;
    debug!(count = holdings.len(), "listed holdings");
    Ok(holdings)
}

pub fn list_by_category(conn: &Connection, category: Category) -> Result<Vec<Holding>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, category, label, amount FROM holdings WHERE category=?1 ORDER BY id",
    )?;
    let holdings = collect_holdings(&mut stmt, params![category.as_str()])?;
    debug!(%category, count = holdings.len(), "listed holdings");
    Ok(holdings)
}

fn collect_holdings<P: rusqlite::Params>(
    stmt: &mut rusqlite::Statement<'_>,
    params: P,
) -> Result<Vec<Holding>> {
    let rows = stmt.query_map(params, |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut holdings = Vec::new();
    for row in rows {
        let (id, category_s, label, amount_s) = row?;
        let category = parse_category(&category_s)
            .with_context(|| format!("Holding #{} has an unreadable category", id))?;
        let amount = parse_stored_decimal(&amount_s, "amount")
            .with_context(|| format!("Holding #{} has an unreadable amount", id))?;
        holdings.push(Holding {
            id,
            category,
            label,
            amount,
        });
    }
    Ok(holdings)
}
