// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(kind: &'static str, detail: String) -> Self {
        Issue { kind, detail }
    }
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = diagnose(conn)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Read-only scan of the stored rows. Reports problems instead of failing on
/// the first one, so a damaged ledger can still be inspected.
pub fn diagnose(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    // 1) Holdings
    let mut stmt = conn.prepare("SELECT id, category, amount FROM holdings ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let category: String = r.get(1)?;
        let amount: String = r.get(2)?;
        if category.parse::<Category>().is_err() {
            issues.push(Issue::new(
                "unknown_category",
                format!("holding #{} '{}'", id, category),
            ));
        }
        match Decimal::from_str_exact(&amount) {
            Err(_) => issues.push(Issue::new(
                "bad_amount",
                format!("holding #{} '{}'", id, amount),
            )),
            Ok(d) if d.scale() != 2 => issues.push(Issue::new(
                "amount_scale",
                format!("holding #{} '{}' is not at two places", id, amount),
            )),
            // Accepted on input, but worth surfacing
            Ok(d) if d.is_sign_negative() => issues.push(Issue::new(
                "negative_amount",
                format!("holding #{} {}", id, amount),
            )),
            Ok(_) => {}
        }
    }

    // 2) Snapshots whose category totals do not add up to the grand total
    let mut stmt2 = conn.prepare(
        "SELECT id, grand_total, nasdaq_total, sp_total, conservative_total, cash_total
         FROM history_records ORDER BY id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let mut values = Vec::with_capacity(5);
        for idx in 1..=5 {
            let s: String = r.get(idx)?;
            match Decimal::from_str_exact(&s) {
                Ok(d) => values.push(d),
                Err(_) => {
                    issues.push(Issue::new(
                        "bad_snapshot_total",
                        format!("snapshot #{} '{}'", id, s),
                    ));
                }
            }
        }
        if values.len() == 5 {
            let parts = values[1..]
                .iter()
                .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v));
            match parts {
                Some(parts) if parts == values[0] => {}
                Some(parts) => issues.push(Issue::new(
                    "snapshot_mismatch",
                    format!("snapshot #{} grand {} != parts {}", id, values[0], parts),
                )),
                None => issues.push(Issue::new(
                    "snapshot_mismatch",
                    format!("snapshot #{} parts overflow the decimal range", id),
                )),
            }
        }
    }

    Ok(issues)
}
