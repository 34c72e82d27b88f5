// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use holdfast::commands::{holdings::add_holding, snapshots};
use holdfast::errors::LedgerError;
use holdfast::models::Category;
use holdfast::cli;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE holdings(id INTEGER PRIMARY KEY AUTOINCREMENT, category TEXT NOT NULL, label TEXT NOT NULL, amount TEXT NOT NULL);
        CREATE TABLE history_records(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recorded_at TEXT NOT NULL,
            grand_total TEXT NOT NULL,
            nasdaq_total TEXT NOT NULL,
            sp_total TEXT NOT NULL,
            conservative_total TEXT NOT NULL,
            cash_total TEXT NOT NULL
        );
        "#,
    )
    .unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn history_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM history_records", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn capture_on_empty_store_fails_without_writing() {
    let conn = setup();
    let err = snapshots::capture_snapshot(&conn).unwrap_err();
    assert_eq!(
        err.downcast_ref::<LedgerError>(),
        Some(&LedgerError::NoHoldings)
    );
    assert_eq!(history_count(&conn), 0);
}

#[test]
fn capture_records_rounded_totals() {
    let conn = setup();
    add_holding(&conn, Category::Nasdaq, "QQQ", dec("1000.00")).unwrap();
    add_holding(&conn, Category::Sp, "VOO", dec("500.00")).unwrap();
    add_holding(&conn, Category::Conservative, "Bonds", dec("200.00")).unwrap();
    add_holding(&conn, Category::Cash, "A", dec("0.33")).unwrap();
    add_holding(&conn, Category::Cash, "B", dec("0.33")).unwrap();
    add_holding(&conn, Category::Cash, "C", dec("0.34")).unwrap();

    let snap = snapshots::capture_snapshot(&conn).unwrap();
    assert_eq!(snap.grand_total.to_string(), "1701.00");
    assert_eq!(snap.nasdaq_total.to_string(), "1000.00");
    assert_eq!(snap.sp_total.to_string(), "500.00");
    assert_eq!(snap.conservative_total.to_string(), "200.00");
    assert_eq!(snap.cash_total.to_string(), "1.00");

    let stored: (String, String) = conn
        .query_row(
            "SELECT grand_total, cash_total FROM history_records WHERE id=?1",
            [snap.id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(stored, ("1701.00".to_string(), "1.00".to_string()));
}

#[test]
fn snapshot_with_zero_grand_total_is_allowed() {
    let conn = setup();
    add_holding(&conn, Category::Nasdaq, "Long", dec("10.00")).unwrap();
    add_holding(&conn, Category::Cash, "Short", dec("-10.00")).unwrap();
    let snap = snapshots::capture_snapshot(&conn).unwrap();
    assert!(snap.grand_total.is_zero());
    assert!(snap.share(Category::Nasdaq).is_none());
}

#[test]
fn history_after_n_captures_is_non_increasing() {
    let conn = setup();
    add_holding(&conn, Category::Cash, "Wallet", dec("1.00")).unwrap();
    for i in 0..5 {
        add_holding(&conn, Category::Sp, "VOO", dec("1.00")).unwrap();
        let snap = snapshots::capture_snapshot(&conn).unwrap();
        assert_eq!(snap.sp_total, Decimal::from(i + 1));
    }

    let history = snapshots::list_history(&conn, None).unwrap();
    assert_eq!(history.len(), 5);
    for pair in history.windows(2) {
        assert!(pair[0].recorded_at >= pair[1].recorded_at);
    }
    assert_eq!(history[0].sp_total, dec("5.00"));
}

#[test]
fn cli_list_respects_limit() {
    let conn = setup();
    add_holding(&conn, Category::Cash, "Wallet", dec("1.00")).unwrap();
    for _ in 0..3 {
        snapshots::capture_snapshot(&conn).unwrap();
    }

    let matches =
        cli::build_cli().get_matches_from(["holdfast", "snapshot", "list", "--limit", "2"]);
    if let Some(("snapshot", snap_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = snap_m.subcommand() {
            let limit = list_m.get_one::<usize>("limit").copied();
            assert_eq!(snapshots::list_history(&conn, limit).unwrap().len(), 2);
            snapshots::handle(&conn, snap_m).unwrap();
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no snapshot subcommand");
    }
}
