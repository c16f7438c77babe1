// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use spendwise::analytics::{
    BudgetLevel, aggregate_category_totals, budget_statuses, filter_period, parse_transaction_date,
};
use spendwise::error::AnalyticsError;
use spendwise::db::TransactionSource;
use spendwise::models::{Budget, Transaction, TransactionStatus, parse_status};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(id: &str, date: &str, amount: &str, category: Option<&str>) -> Transaction {
    let t = Transaction::new(id, date, dec(amount));
    match category {
        Some(c) => t.with_category(c),
        None => t,
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        tx("1", "01/03/2025", "-12.50", Some("Food")),
        tx("2", "05/03/2025", "-7.50", Some("Food")),
        tx("3", "06/03/2025", "-100", Some("Bills")),
        tx("4", "07/03/2025", "2500", Some("Salary")),
        tx("5", "08/03/2025", "-3", None),
        tx("6", "08/04/2025", "-40", Some("Food")),
        tx("7", "08/03/2024", "-40", Some("Food")),
    ]
}

#[test]
fn sums_expenses_per_category_for_the_month() {
    let summary = aggregate_category_totals(&sample(), 3, 2025, false).unwrap();
    let cats: Vec<&str> = summary.category_totals.keys().map(|k| k.as_str()).collect();
    assert_eq!(cats, vec!["Bills", "Food", "Uncategorized"]);
    assert_eq!(summary.category_totals["Food"], dec("-20.00"));
    assert_eq!(summary.category_totals["Bills"], dec("-100"));
    assert_eq!(summary.category_totals["Uncategorized"], dec("-3"));
    assert_eq!(summary.total_spending, dec("-123.00"));
    assert_eq!(summary.transaction_count, 4);
    assert_eq!(summary.active_categories(), 3);
}

#[test]
fn income_is_summed_only_when_requested() {
    let summary = aggregate_category_totals(&sample(), 3, 2025, true).unwrap();
    assert_eq!(summary.category_totals["Salary"], dec("2500"));
    assert_eq!(summary.total_spending, dec("2377.00"));
}

#[test]
fn empty_period_yields_empty_totals() {
    let summary = aggregate_category_totals(&sample(), 6, 2025, false).unwrap();
    assert!(summary.category_totals.is_empty());
    assert_eq!(summary.total_spending, Decimal::ZERO);
    assert_eq!(summary.transaction_count, 0);
}

#[test]
fn blank_category_is_uncategorized() {
    let txs = vec![tx("1", "01/03/2025", "-1", Some("   "))];
    let summary = aggregate_category_totals(&txs, 3, 2025, false).unwrap();
    assert!(summary.category_totals.contains_key("Uncategorized"));
}

#[test]
fn malformed_date_anywhere_fails_with_record_id() {
    let mut txs = sample();
    txs.push(tx("bad-1", "2025-03-01", "-1", Some("Food")));
    let err = aggregate_category_totals(&txs, 3, 2025, false).unwrap_err();
    match err {
        AnalyticsError::Parse { id, .. } => assert_eq!(id, "bad-1"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn month_out_of_range_is_invalid_parameter() {
    let err = filter_period(&sample(), 13, 2025).unwrap_err();
    assert!(matches!(
        err,
        AnalyticsError::InvalidParameter { field: "month", .. }
    ));
}

#[test]
fn date_parser_accepts_unpadded_and_rejects_impossible_dates() {
    let d = parse_transaction_date("x", "3/2/2025").unwrap();
    assert_eq!(d, chrono::NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    assert!(parse_transaction_date("x", "29/02/2025").is_err());
    assert!(parse_transaction_date("x", "29/02/2024").is_ok());
    assert!(parse_transaction_date("x", "aa/02/2024").is_err());
    assert!(parse_transaction_date("x", "01/02").is_err());
}

#[test]
fn budget_statuses_report_levels_and_overspend() {
    let summary = aggregate_category_totals(&sample(), 3, 2025, false).unwrap();
    let mut budget = Budget::new();
    budget.insert("Food".into(), dec("100"));
    budget.insert("Bills".into(), dec("80"));
    budget.insert("Uncategorized".into(), Decimal::ZERO);

    let statuses = budget_statuses(&summary.category_totals, &budget);
    let bills = statuses.iter().find(|s| s.category == "Bills").unwrap();
    assert!(bills.over_budget);
    assert_eq!(bills.level, Some(BudgetLevel::Over));
    assert_eq!(bills.progress, Some(Decimal::ONE));

    let food = statuses.iter().find(|s| s.category == "Food").unwrap();
    assert!(!food.over_budget);
    assert_eq!(food.level, Some(BudgetLevel::Relaxed));
    assert_eq!(food.spent, dec("20"));

    let none = statuses.iter().find(|s| s.category == "Uncategorized").unwrap();
    assert_eq!(none.limit, None);
    assert_eq!(none.level, None);
}

#[test]
fn budget_level_boundaries() {
    assert_eq!(BudgetLevel::from_ratio(dec("0.49")), BudgetLevel::Relaxed);
    assert_eq!(BudgetLevel::from_ratio(dec("0.5")), BudgetLevel::Watchful);
    assert_eq!(BudgetLevel::from_ratio(dec("0.8")), BudgetLevel::Stretched);
    assert_eq!(BudgetLevel::from_ratio(dec("1")), BudgetLevel::Stretched);
    assert_eq!(BudgetLevel::from_ratio(dec("1.01")), BudgetLevel::Over);
}

#[test]
fn aggregation_is_repeatable() {
    let txs = sample();
    let first = aggregate_category_totals(&txs, 3, 2025, false).unwrap();
    let second = aggregate_category_totals(&txs, 3, 2025, false).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unknown_status_is_a_parse_error_for_its_record() {
    let err = parse_status("tx-9", " Pending ").unwrap_err();
    match err {
        AnalyticsError::Parse { id, reason } => {
            assert_eq!(id, "tx-9");
            assert!(reason.contains("' Pending '"));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(
        parse_status("tx-1", "COMPLETED").unwrap(),
        TransactionStatus::Completed
    );
}

#[test]
fn stored_row_with_unknown_status_fails_to_load() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    spendwise::db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO transactions(date, amount, status) VALUES ('01/03/2025', '-1', 'Pending')",
        [],
    )
    .unwrap();
    let err = conn.list_transactions().unwrap_err();
    let parse = err.downcast_ref::<AnalyticsError>().unwrap();
    assert!(matches!(parse, AnalyticsError::Parse { id, .. } if id == "1"));
}
