// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::allocation::{aggregate, recommend};
use crate::commands::holdings::list_holdings;
use crate::models::{Category, CategoryTotals, Recommendation};
use crate::utils::{fmt_money, fmt_signed_money, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use tracing::debug;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let rec = get_recommendation(conn)?;
    if m.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&rec)?);
    } else {
        println!(
            "{}",
            pretty_table(
                &["Category", "Current", "Target", "Ratio", "Adjustment"],
                recommendation_rows(&rec),
            )
        );
    }
    Ok(())
}

/// Current totals straight from the store.
pub fn current_totals(conn: &Connection) -> Result<CategoryTotals> {
    let holdings = list_holdings(conn)?;
    Ok(aggregate(&holdings)?)
}

/// Recomputed on every call; fails with `LedgerError::ZeroTotal` when the
/// grand total is zero.
pub fn get_recommendation(conn: &Connection) -> Result<Recommendation> {
    let totals = current_totals(conn)?;
    let rec = recommend(&totals)?;
    debug!(grand = %totals.grand, risk = %rec.risk_target, "recommendation computed");
    Ok(rec)
}

fn recommendation_rows(rec: &Recommendation) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Category::ALL
        .iter()
        .map(|&category| {
            let current = fmt_money(&rec.current.get(category));
            match rec.target_for(category) {
                Some(t) => vec![
                    category.display_name().to_string(),
                    current,
                    fmt_money(&t.amount),
                    t.ratio.clone(),
                    fmt_signed_money(&t.adjustment),
                ],
                None => vec![
                    category.display_name().to_string(),
                    current,
                    "-".into(),
                    "-".into(),
                    "-".into(),
                ],
            }
        })
        .collect();
    rows.push(vec![
        "Total".into(),
        fmt_money(&rec.current.grand),
        String::new(),
        String::new(),
        String::new(),
    ]);
    rows
}
