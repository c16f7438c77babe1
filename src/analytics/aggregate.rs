// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly category totals and budget status.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::models::{Budget, CategoryTotals, Transaction};

/// Parse a stored `DD/MM/YYYY` date, attributing failures to `id`.
pub fn parse_transaction_date(id: &str, raw: &str) -> Result<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return Err(AnalyticsError::parse(
            id,
            format!("date '{}' is not DD/MM/YYYY", raw),
        ));
    }
    let bad_part = |name: &str, part: &str| {
        AnalyticsError::parse(
            id,
            format!("{} '{}' in date '{}' is not a number", name, part, raw),
        )
    };
    let day: u32 = parts[0].trim().parse().map_err(|_| bad_part("day", parts[0]))?;
    let month: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| bad_part("month", parts[1]))?;
    let year: i32 = parts[2].trim().parse().map_err(|_| bad_part("year", parts[2]))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AnalyticsError::parse(id, format!("date '{}' is not a calendar date", raw))
    })
}

fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(AnalyticsError::invalid(
            "month",
            format!("{} is outside 1..=12", month),
        ))
    }
}

/// Transactions dated inside `month`/`year`, in input order.
///
/// Every date is validated, including those outside the period.
pub fn filter_period(transactions: &[Transaction], month: u32, year: i32) -> Result<Vec<Transaction>> {
    check_month(month)?;
    let mut out = Vec::new();
    for tx in transactions {
        let date = parse_transaction_date(&tx.id, &tx.date)?;
        if date.month() == month && date.year() == year {
            out.push(tx.clone());
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpendingSummary {
    pub category_totals: CategoryTotals,
    /// Sum of all included amounts; zero or negative unless income is included.
    pub total_spending: Decimal,
    pub transaction_count: usize,
}

impl SpendingSummary {
    /// Number of categories whose total is not zero.
    pub fn active_categories(&self) -> usize {
        self.category_totals.values().filter(|v| !v.is_zero()).count()
    }
}

/// Sum amounts per category for one calendar month.
///
/// Only expenses count unless `include_income` is set, in which case every
/// amount in the period is summed.
pub fn aggregate_category_totals(
    transactions: &[Transaction],
    month: u32,
    year: i32,
    include_income: bool,
) -> Result<SpendingSummary> {
    let in_period = filter_period(transactions, month, year)?;
    let mut summary = SpendingSummary::default();
    for tx in in_period
        .iter()
        .filter(|tx| include_income || tx.is_expense())
    {
        *summary
            .category_totals
            .entry(tx.category_label().to_string())
            .or_insert(Decimal::ZERO) += tx.amount;
        summary.total_spending += tx.amount;
        summary.transaction_count += 1;
    }
    debug!(
        month,
        year,
        include_income,
        categories = summary.category_totals.len(),
        total = %summary.total_spending,
        "aggregated category totals"
    );
    Ok(summary)
}

/// How much of a budget has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetLevel {
    /// Under half of the limit.
    Relaxed,
    /// Under 80%.
    Watchful,
    /// Up to and including the limit.
    Stretched,
    Over,
}

impl BudgetLevel {
    pub fn from_ratio(ratio: Decimal) -> Self {
        if ratio < Decimal::new(5, 1) {
            BudgetLevel::Relaxed
        } else if ratio < Decimal::new(8, 1) {
            BudgetLevel::Watchful
        } else if ratio <= Decimal::ONE {
            BudgetLevel::Stretched
        } else {
            BudgetLevel::Over
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            BudgetLevel::Relaxed => "😊",
            BudgetLevel::Watchful => "😬",
            BudgetLevel::Stretched => "😰",
            BudgetLevel::Over => "😱",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    /// Absolute spend for the period.
    pub spent: Decimal,
    pub limit: Option<Decimal>,
    /// `spent / limit`, capped at 1.
    pub progress: Option<Decimal>,
    pub over_budget: bool,
    pub level: Option<BudgetLevel>,
    /// Percentage of the period's total spending.
    pub share: Decimal,
}

/// Compare each category total with its limit. A zero limit counts as unset.
pub fn budget_statuses(totals: &CategoryTotals, budget: &Budget) -> Vec<BudgetStatus> {
    let total: Decimal = totals.values().map(|v| v.abs()).sum();
    totals
        .iter()
        .map(|(category, amount)| {
            let spent = amount.abs();
            let limit = budget.get(category).copied().filter(|l| *l > Decimal::ZERO);
            let ratio = limit.map(|l| spent / l);
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                spent / total * Decimal::ONE_HUNDRED
            };
            BudgetStatus {
                category: category.clone(),
                spent,
                limit,
                progress: ratio.map(|r| r.min(Decimal::ONE)),
                over_budget: limit.is_some_and(|l| spent > l),
                level: ratio.map(BudgetLevel::from_ratio),
                share,
            }
        })
        .collect()
}
