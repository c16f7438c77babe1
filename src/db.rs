// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::analytics::UserProgress;
use crate::models::{Budget, BudgetPeriod, Transaction, parse_status};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Spendwise", "spendwise"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "SPENDWISE_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("spendwise.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- date is kept exactly as entered (DD/MM/YYYY); it is parsed on read
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        transaction_type TEXT NOT NULL DEFAULT '',
        amount TEXT NOT NULL,
        wallet_balance TEXT,
        status TEXT NOT NULL DEFAULT 'Success',
        category TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- period is 'global' or YYYY_M
    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        period TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        UNIQUE(period, category)
    );

    CREATE TABLE IF NOT EXISTS user_progress(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        xp INTEGER NOT NULL,
        level INTEGER NOT NULL,
        streak INTEGER NOT NULL,
        last_login TEXT
    );
    "#,
    )?;
    Ok(())
}

/// Anything that can hand the analytics every known transaction.
pub trait TransactionSource {
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
}

/// Anything that can resolve category limits for a period.
pub trait BudgetSource {
    fn budget_for(&self, period: &BudgetPeriod) -> Result<Budget>;
}

const TX_COLUMNS: &str =
    "id, date, description, transaction_type, amount, wallet_balance, status, category";

fn parse_amount(id: &str, field: &str, raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in transaction {}", field, raw, id))
}

fn row_to_transaction(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let id = r.get::<_, i64>(0)?.to_string();
    let amount_s: String = r.get(4)?;
    let balance_s: Option<String> = r.get(5)?;
    let status_s: String = r.get(6)?;
    let amount = parse_amount(&id, "amount", &amount_s)?;
    let wallet_balance = match balance_s {
        Some(b) => Some(parse_amount(&id, "wallet balance", &b)?),
        None => None,
    };
    let status = parse_status(&id, &status_s)?;
    Ok(Transaction {
        date: r.get(1)?,
        description: r.get(2)?,
        transaction_type: r.get(3)?,
        amount,
        wallet_balance,
        status,
        category: r.get(7)?,
        is_abnormal: false,
        id,
    })
}

impl TransactionSource for Connection {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.prepare(&format!(
            "SELECT {} FROM transactions ORDER BY id",
            TX_COLUMNS
        ))?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(row_to_transaction(r)?);
        }
        debug!(count = out.len(), "loaded transactions");
        Ok(out)
    }
}

fn budget_entries(conn: &Connection, key: &str) -> Result<Vec<(String, Decimal)>> {
    let mut stmt =
        conn.prepare("SELECT category, amount FROM budgets WHERE period=?1 ORDER BY category")?;
    let rows = stmt.query_map(params![key], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (category, amount_s) = row?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", amount_s, category))?;
        out.push((category, amount));
    }
    Ok(out)
}

impl BudgetSource for Connection {
    /// A month resolves to the global limits overlaid with that month's own.
    fn budget_for(&self, period: &BudgetPeriod) -> Result<Budget> {
        let mut budget: Budget = budget_entries(self, &BudgetPeriod::Global.key())?
            .into_iter()
            .collect();
        if let BudgetPeriod::Month { .. } = period {
            budget.extend(budget_entries(self, &period.key())?);
        }
        Ok(budget)
    }
}

/// Store a transaction and return the id the store assigned to it.
pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<String> {
    conn.execute(
        "INSERT INTO transactions(date, description, transaction_type, amount, wallet_balance, status, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            tx.date.trim(),
            tx.description,
            tx.transaction_type,
            tx.amount.to_string(),
            tx.wallet_balance.map(|b| b.to_string()),
            tx.status.as_str(),
            tx.category.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        ],
    )?;
    Ok(conn.last_insert_rowid().to_string())
}

pub fn set_budget(
    conn: &Connection,
    period: &BudgetPeriod,
    category: &str,
    amount: Decimal,
) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets(period, category, amount) VALUES (?1,?2,?3)
         ON CONFLICT(period, category) DO UPDATE SET amount=excluded.amount",
        params![period.key(), category, amount.to_string()],
    )?;
    Ok(())
}

/// Every stored budget row as (period, category, amount).
pub fn list_budgets(
    conn: &Connection,
    period: Option<&BudgetPeriod>,
) -> Result<Vec<(String, String, Decimal)>> {
    let mut sql = String::from("SELECT period, category, amount FROM budgets");
    let mut args: Vec<String> = Vec::new();
    if let Some(p) = period {
        sql.push_str(" WHERE period=?1");
        args.push(p.key());
    }
    sql.push_str(" ORDER BY period, category");
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let period: String = r.get(0)?;
        let category: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let amount = amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget amount '{}' for {}", amount_s, category))?;
        out.push((period, category, amount));
    }
    Ok(out)
}

pub fn load_progress(conn: &Connection) -> Result<UserProgress> {
    let row: Option<(u32, u32, u32, Option<String>)> = conn
        .query_row(
            "SELECT xp, level, streak, last_login FROM user_progress WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;
    let Some((xp, level, streak, last)) = row else {
        return Ok(UserProgress::default());
    };
    let last_login = match last {
        Some(s) => Some(
            DateTime::parse_from_rfc3339(&s)
                .with_context(|| format!("Invalid last login '{}'", s))?
                .with_timezone(&Utc),
        ),
        None => None,
    };
    Ok(UserProgress {
        xp,
        level,
        streak,
        last_login,
    })
}

pub fn save_progress(conn: &Connection, progress: &UserProgress) -> Result<()> {
    conn.execute(
        "INSERT INTO user_progress(id, xp, level, streak, last_login) VALUES (1,?1,?2,?3,?4)
         ON CONFLICT(id) DO UPDATE SET xp=excluded.xp, level=excluded.level,
         streak=excluded.streak, last_login=excluded.last_login",
        params![
            progress.xp,
            progress.level,
            progress.streak,
            progress.last_login.map(|t| t.to_rfc3339()),
        ],
    )?;
    Ok(())
}
