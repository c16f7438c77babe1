// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{list_budgets, set_budget};
use crate::models::BudgetPeriod;
use crate::utils::{currency, fmt_money, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = sub.get_one::<String>("period").unwrap().parse::<BudgetPeriod>()?;
    let cat = sub.get_one::<String>("category").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if cat.is_empty() {
        return Err(anyhow!("Category must not be empty"));
    }
    if amount < Decimal::ZERO {
        return Err(anyhow!("Budget for {} must not be negative", cat));
    }
    set_budget(conn, &period, cat, amount)?;
    println!(
        "Budget set for {} / {} = {}",
        period,
        cat,
        fmt_money(&amount, &currency(conn)?)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period = match sub.get_one::<String>("period") {
        Some(p) => Some(p.parse::<BudgetPeriod>()?),
        None => None,
    };
    let data: Vec<Vec<String>> = list_budgets(conn, period.as_ref())?
        .into_iter()
        .map(|(p, c, a)| vec![p, c, format!("{:.2}", a)])
        .collect();
    println!("{}", pretty_table(&["Period", "Category", "Limit"], data));
    Ok(())
}
