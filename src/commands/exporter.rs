// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::classify_by_month;
use crate::db::TransactionSource;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap();
            let out = sub.get_one::<String>("out").unwrap();
            let n = export_transactions(conn, fmt, Path::new(out))?;
            println!("Exported {} transactions to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Write every stored transaction to `out` as `csv` or `json`.
///
/// The JSON form carries `is_abnormal`, computed within each transaction's
/// calendar month as the reports do; CSV keeps the columns
/// `import transactions` reads back.
pub fn export_transactions(conn: &Connection, format: &str, out: &Path) -> Result<usize> {
    let fmt = format.trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let rows = classify_by_month(&conn.list_transactions()?)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "description",
                "type",
                "amount",
                "balance",
                "status",
                "category",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.clone(),
                    t.date.clone(),
                    t.description.clone(),
                    t.transaction_type.clone(),
                    t.amount.to_string(),
                    t.wallet_balance.map(|b| b.to_string()).unwrap_or_default(),
                    t.status.to_string(),
                    t.category.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => std::fs::write(out, serde_json::to_string_pretty(&rows)?)?,
    }
    info!(count = rows.len(), format = %fmt, path = %out.display(), "export finished");
    Ok(rows.len())
}
