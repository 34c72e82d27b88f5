// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use holdfast::commands::{holdings::add_holding, recommend};
use holdfast::errors::LedgerError;
use holdfast::models::Category;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    holdfast::db::init_schema(&conn).unwrap();
    conn
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn seed(conn: &Connection) {
    add_holding(conn, Category::Nasdaq, "QQQ", dec("600.00")).unwrap();
    add_holding(conn, Category::Nasdaq, "ONEQ", dec("400.00")).unwrap();
    add_holding(conn, Category::Sp, "VOO", dec("500.00")).unwrap();
    add_holding(conn, Category::Conservative, "Bonds", dec("200.00")).unwrap();
    add_holding(conn, Category::Cash, "Wallet", dec("300.00")).unwrap();
}

#[test]
fn recommendation_from_stored_holdings() {
    let conn = setup();
    seed(&conn);

    let rec = recommend::get_recommendation(&conn).unwrap();
    assert_eq!(rec.current.nasdaq, dec("1000.00"));
    assert_eq!(rec.current.grand, dec("2000.00"));
    assert_eq!(rec.risk_target, dec("1500.00"));

    let amounts: Vec<(Category, String, String)> = rec
        .targets
        .iter()
        .map(|t| (t.category, t.amount.to_string(), t.ratio.clone()))
        .collect();
    assert_eq!(
        amounts,
        vec![
            (Category::Nasdaq, "1155.00".to_string(), "57.75%".to_string()),
            (Category::Sp, "345.00".to_string(), "17.25%".to_string()),
            (Category::Cash, "500.00".to_string(), "25.00%".to_string()),
        ]
    );
}

#[test]
fn empty_store_is_zero_total() {
    let conn = setup();
    let err = recommend::get_recommendation(&conn).unwrap_err();
    assert_eq!(err.downcast_ref::<LedgerError>(), Some(&LedgerError::ZeroTotal));
}

#[test]
fn repeated_calls_are_identical_and_not_cached() {
    let conn = setup();
    seed(&conn);

    let first = recommend::get_recommendation(&conn).unwrap();
    let second = recommend::get_recommendation(&conn).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    add_holding(&conn, Category::Cash, "Bonus", dec("100.00")).unwrap();
    let third = recommend::get_recommendation(&conn).unwrap();
    assert_eq!(third.current.grand, dec("2100.00"));
    assert_eq!(
        third.target_for(Category::Cash).unwrap().amount,
        dec("525.00")
    );
}

#[test]
fn recommendation_serializes_tokens_and_decimal_strings() {
    let conn = setup();
    seed(&conn);
    let rec = recommend::get_recommendation(&conn).unwrap();
    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["riskTarget"], "1500.00");
    assert_eq!(v["current"]["grand"], "2000.00");
    assert_eq!(v["targets"][1]["category"], "SP");
    assert_eq!(v["targets"][1]["adjustment"], "-155.00");
}

#[test]
fn oversized_stored_rows_fail_without_panicking() {
    let conn = setup();
    // Rows written before amounts were range-checked
    for _ in 0..2 {
        conn.execute(
            "INSERT INTO holdings(category, label, amount) VALUES ('CASH', 'Legacy', '50000000000000000000000000000')",
            [],
        )
        .unwrap();
    }

    let err = recommend::get_recommendation(&conn).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Overflow(_))
    ));

    let err = holdfast::commands::snapshots::capture_snapshot(&conn).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Overflow(_))
    ));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM history_records", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}
