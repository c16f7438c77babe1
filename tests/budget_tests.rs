// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rusqlite::Connection;
use spendwise::db::{self, BudgetSource};
use spendwise::models::BudgetPeriod;
use spendwise::{cli, commands::budgets};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn run_budget(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["spendwise", "budget"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("budget", budget_m)) = matches.subcommand() {
        budgets::handle(conn, budget_m)
    } else {
        panic!("no budget subcommand");
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn month_budget_overlays_global_limits() {
    let conn = setup();
    run_budget(&conn, &["set", "--category", "Food", "--amount", "300"]).unwrap();
    run_budget(&conn, &["set", "--category", "Bills", "--amount", "200"]).unwrap();
    run_budget(
        &conn,
        &["set", "--category", "Food", "--amount", "150", "--period", "2025_8"],
    )
    .unwrap();

    let august = conn
        .budget_for(&BudgetPeriod::Month {
            year: 2025,
            month: 8,
        })
        .unwrap();
    assert_eq!(august.get("Food"), Some(&dec("150")));
    assert_eq!(august.get("Bills"), Some(&dec("200")));

    let july = conn
        .budget_for(&BudgetPeriod::Month {
            year: 2025,
            month: 7,
        })
        .unwrap();
    assert_eq!(july.get("Food"), Some(&dec("300")));

    let global = conn.budget_for(&BudgetPeriod::Global).unwrap();
    assert_eq!(global.len(), 2);
}

#[test]
fn setting_a_budget_twice_replaces_it() {
    let conn = setup();
    run_budget(&conn, &["set", "--category", "Food", "--amount", "100"]).unwrap();
    run_budget(&conn, &["set", "--category", "Food", "--amount", "120.50"]).unwrap();
    let rows = db::list_budgets(&conn, None).unwrap();
    assert_eq!(rows, vec![("global".to_string(), "Food".to_string(), dec("120.50"))]);
}

#[test]
fn negative_budget_is_rejected() {
    let conn = setup();
    let err = run_budget(&conn, &["set", "--category", "Food", "--amount", "-5"]).unwrap_err();
    assert!(err.to_string().contains("must not be negative"));
    assert!(db::list_budgets(&conn, None).unwrap().is_empty());
}

#[test]
fn invalid_period_key_is_rejected() {
    let conn = setup();
    let err = run_budget(
        &conn,
        &["set", "--category", "Food", "--amount", "10", "--period", "2025_13"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("period"));
    assert!(db::list_budgets(&conn, None).unwrap().is_empty());
}

#[test]
fn period_keys_round_trip_through_display() {
    let p: BudgetPeriod = "2025_3".parse().unwrap();
    assert_eq!(p, BudgetPeriod::Month { year: 2025, month: 3 });
    assert_eq!(p.to_string(), "2025_3");
    assert_eq!("GLOBAL".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Global);
    assert!("2025-03".parse::<BudgetPeriod>().is_err());
}
