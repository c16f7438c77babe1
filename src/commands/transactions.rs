// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{classify_anomalies, classify_by_month, filter_period};
use crate::db::{TransactionSource, insert_transaction};
use crate::models::{Transaction, TransactionStatus};
use crate::utils::{
    currency, fmt_money, format_date, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let status = sub
        .get_one::<String>("status")
        .unwrap()
        .parse::<TransactionStatus>()?;
    let wallet_balance = match sub.get_one::<String>("balance") {
        Some(b) => Some(parse_decimal(b)?),
        None => None,
    };

    let mut tx = Transaction::new("", format_date(date), amount).with_status(status);
    tx.description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    tx.transaction_type = sub
        .get_one::<String>("type")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    tx.category = sub.get_one::<String>("category").map(|s| s.trim().to_string());
    tx.wallet_balance = wallet_balance;

    let id = insert_transaction(conn, &tx)?;
    info!(id = %id, "recorded transaction");
    println!(
        "Recorded {} on {} in {} (id {})",
        fmt_money(&amount, &currency(conn)?),
        tx.date,
        tx.category_label(),
        id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.date.clone(),
                    t.description.clone(),
                    format!("{:.2}", t.amount),
                    t.category_label().to_string(),
                    t.status.to_string(),
                    if t.is_abnormal { "⚠".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "Category", "Status", "Abnormal"],
                rows,
            )
        );
    }
    Ok(())
}

/// Transactions for `tx list`, newest first, with `is_abnormal` computed per
/// calendar month.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let all = conn.list_transactions()?;
    let mut data = match super::explicit_period(sub) {
        Some((month, year)) => classify_anomalies(&filter_period(&all, month, year)?),
        None => classify_by_month(&all)?,
    };
    data.reverse();

    if let Some(cat) = sub.get_one::<String>("category") {
        data.retain(|t| t.category_label().eq_ignore_ascii_case(cat.trim()));
    }
    if sub.get_flag("abnormal") {
        data.retain(|t| t.is_abnormal);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
