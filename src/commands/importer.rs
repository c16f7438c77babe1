// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::parse_transaction_date;
use crate::db::insert_transaction;
use crate::models::{Transaction, TransactionStatus, parse_status};
use crate::utils::{format_date, parse_decimal};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, Path::new(path))?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// One imported record with every field still as text.
#[derive(Debug)]
struct RawRecord {
    date: String,
    description: String,
    transaction_type: String,
    amount: String,
    balance: Option<String>,
    status: Option<String>,
    category: Option<String>,
}

impl RawRecord {
    fn into_transaction(self, line: &str) -> Result<Transaction> {
        let date = parse_transaction_date(line, &self.date)?;
        let amount = parse_decimal(&self.amount)
            .with_context(|| format!("Invalid amount '{}' on {}", self.amount, line))?;
        let wallet_balance = match self.balance.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() => Some(
                parse_decimal(b).with_context(|| format!("Invalid balance '{}' on {}", b, line))?,
            ),
            _ => None,
        };
        let status = match self.status.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => parse_status(line, s)?,
            _ => TransactionStatus::default(),
        };
        let mut tx = Transaction::new("", format_date(date), amount).with_status(status);
        tx.description = self.description.trim().to_string();
        tx.transaction_type = self.transaction_type.trim().to_string();
        tx.wallet_balance = wallet_balance;
        tx.category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(tx)
    }
}

fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;
    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let date_i = col("date").context("CSV has no 'date' column")?;
    let amount_i = col("amount").context("CSV has no 'amount' column")?;
    let desc_i = col("description");
    let type_i = col("type").or_else(|| col("transaction_type"));
    let balance_i = col("balance").or_else(|| col("wallet_balance"));
    let status_i = col("status");
    let category_i = col("category");

    let mut out = Vec::new();
    for result in rdr.records() {
        let rec = result?;
        let opt = |i: Option<usize>| i.and_then(|i| rec.get(i)).map(str::to_string);
        out.push(RawRecord {
            date: rec.get(date_i).unwrap_or("").to_string(),
            amount: rec.get(amount_i).unwrap_or("").to_string(),
            description: opt(desc_i).unwrap_or_default(),
            transaction_type: opt(type_i).unwrap_or_default(),
            balance: opt(balance_i),
            status: opt(status_i),
            category: opt(category_i),
        });
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    date: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "type")]
    transaction_type: String,
    amount: serde_json::Value,
    #[serde(default, alias = "balance")]
    wallet_balance: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

fn number_text(v: &serde_json::Value) -> Result<String> {
    match v {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::String(s) => Ok(s.clone()),
        other => Err(anyhow!("Expected a number, found {}", other)),
    }
}

fn read_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Open JSON {}", path.display()))?;
    let records: Vec<JsonRecord> = serde_json::from_str(&text)
        .with_context(|| format!("Parse JSON {}", path.display()))?;
    records
        .into_iter()
        .map(|r| -> Result<RawRecord> {
            Ok(RawRecord {
                amount: number_text(&r.amount)?,
                balance: match r.wallet_balance.as_ref().filter(|v| !v.is_null()) {
                    Some(v) => Some(number_text(v)?),
                    None => None,
                },
                date: r.date,
                description: r.description,
                transaction_type: r.transaction_type,
                status: r.status,
                category: r.category,
            })
        })
        .collect()
}

/// Import every record in `path` atomically; returns how many were stored.
///
/// `.json` files hold an array of transaction objects; anything else is read
/// as CSV with a header row.
pub fn import_transactions(conn: &mut Connection, path: &Path) -> Result<usize> {
    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let records = if is_json {
        read_json(path)?
    } else {
        read_csv(path)?
    };

    let db_tx = conn.transaction()?;
    let mut count = 0usize;
    let mut total = Decimal::ZERO;
    for (i, rec) in records.into_iter().enumerate() {
        let line = format!("record {}", i + 1);
        let tx = rec.into_transaction(&line)?;
        total += tx.amount;
        let id = insert_transaction(&db_tx, &tx)?;
        debug!(id = %id, date = %tx.date, "imported transaction");
        count += 1;
    }
    db_tx.commit()?;
    info!(count, net = %total, path = %path.display(), "import finished");
    Ok(count)
}
