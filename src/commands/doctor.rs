// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::parse_transaction_date;
use crate::models::{BudgetPeriod, parse_status};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::warn;

/// Scan stored rows for values the analytics would reject.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();

    let mut stmt = conn.prepare("SELECT id, date, amount, status FROM transactions ORDER BY id")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id = r.get::<_, i64>(0)?.to_string();
        let date: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let status: String = r.get(3)?;
        if let Err(e) = parse_transaction_date(&id, &date) {
            issues.push(("bad_date".into(), e.to_string()));
        }
        if amount.parse::<Decimal>().is_err() {
            issues.push(("bad_amount".into(), format!("transaction {}: '{}'", id, amount)));
        }
        if let Err(e) = parse_status(&id, &status) {
            issues.push(("bad_status".into(), e.to_string()));
        }
    }

    let mut stmt2 = conn.prepare("SELECT period, category, amount FROM budgets ORDER BY period, category")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let period: String = r.get(0)?;
        let category: String = r.get(1)?;
        let amount: String = r.get(2)?;
        if period.parse::<BudgetPeriod>().is_err() {
            issues.push(("bad_budget_period".into(), format!("{} / {}", period, category)));
        }
        match amount.parse::<Decimal>() {
            Ok(a) if a < Decimal::ZERO => {
                issues.push(("negative_budget".into(), format!("{} / {} = {}", period, category, a)))
            }
            Ok(_) => {}
            Err(_) => issues.push((
                "bad_budget_amount".into(),
                format!("{} / {}: '{}'", period, category, amount),
            )),
        }
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        warn!(count = issues.len(), "doctor found problems in stored data");
        let rows = issues.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
