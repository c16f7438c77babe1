// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rusqlite::Connection;
use spendwise::db::{self, TransactionSource};
use spendwise::models::{Transaction, TransactionStatus};
use spendwise::{cli, commands::transactions};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    for i in 1..=3 {
        let tx = Transaction::new("", format!("0{}/01/2025", i), Decimal::from(-10))
            .with_category("Food");
        db::insert_transaction(&conn, &tx).unwrap();
    }
    conn
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<Transaction> {
    let mut argv = vec!["spendwise", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            transactions::query_rows(conn, list_m).unwrap()
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let rows = list_rows(&conn, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "03/01/2025");
}

#[test]
fn list_filters_by_period_and_flags_abnormal() {
    let conn = setup();
    let big = Transaction::new("", "04/01/2025", Decimal::from(-50)).with_category("Food");
    db::insert_transaction(&conn, &big).unwrap();
    let other_month = Transaction::new("", "04/02/2025", Decimal::from(-5)).with_category("Food");
    db::insert_transaction(&conn, &other_month).unwrap();

    let january = list_rows(&conn, &["--month", "1", "--year", "2025"]);
    assert_eq!(january.len(), 4);

    let abnormal = list_rows(&conn, &["--month", "1", "--year", "2025", "--abnormal"]);
    assert_eq!(abnormal.len(), 1);
    assert_eq!(abnormal[0].date, "04/01/2025");
}

#[test]
fn list_category_filter_matches_uncategorized_label() {
    let conn = setup();
    db::insert_transaction(&conn, &Transaction::new("", "05/01/2025", Decimal::from(-3))).unwrap();
    let rows = list_rows(&conn, &["--category", "uncategorized"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, None);
}

#[test]
fn add_normalizes_date_and_keeps_fields() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "spendwise",
        "tx",
        "add",
        "--date",
        "3/2/2025",
        "--amount",
        "-12.50",
        "--category",
        " Food ",
        "--description",
        "Lunch",
        "--status",
        "completed",
        "--balance",
        "87.50",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&conn, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }

    let stored = conn.list_transactions().unwrap();
    assert_eq!(stored.len(), 1);
    let tx = &stored[0];
    assert_eq!(tx.id, "1");
    assert_eq!(tx.date, "03/02/2025");
    assert_eq!(tx.amount, "-12.50".parse::<Decimal>().unwrap());
    assert_eq!(tx.category.as_deref(), Some("Food"));
    assert_eq!(tx.status, TransactionStatus::Completed);
    assert_eq!(tx.wallet_balance, Some("87.50".parse().unwrap()));
}

#[test]
fn add_rejects_impossible_date() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "spendwise", "tx", "add", "--date", "30/02/2025", "--amount", "-1",
    ]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        let err = transactions::handle(&conn, tx_m).unwrap_err();
        assert!(err.to_string().contains("Invalid date '30/02/2025'"));
    } else {
        panic!("no tx subcommand");
    }
    assert!(conn.list_transactions().unwrap().is_empty());
}
