// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Label used when a transaction carries no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category name to monthly limit, already resolved for one period.
pub type Budget = BTreeMap<String, Decimal>;

/// Category name to the signed sum of its amounts for one period.
pub type CategoryTotals = BTreeMap<String, Decimal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[default]
    Success,
    Planned,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "Success",
            TransactionStatus::Planned => "Planned",
            TransactionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a status case-insensitively, attributing failures to record `id`.
pub fn parse_status(id: &str, raw: &str) -> Result<TransactionStatus, AnalyticsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "success" => Ok(TransactionStatus::Success),
        "planned" => Ok(TransactionStatus::Planned),
        "completed" => Ok(TransactionStatus::Completed),
        _ => Err(AnalyticsError::parse(
            id,
            format!("status '{}' is not one of Success, Planned, Completed", raw),
        )),
    }
}

impl FromStr for TransactionStatus {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_status("input", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String, // DD/MM/YYYY
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transaction_type: String,
    pub amount: Decimal,
    #[serde(default)]
    pub wallet_balance: Option<Decimal>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub category: Option<String>,
    /// Set by the anomaly classifier; never read back from storage.
    #[serde(default, skip_deserializing)]
    pub is_abnormal: bool,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: impl Into<String>, amount: Decimal) -> Self {
        Transaction {
            id: id.into(),
            date: date.into(),
            description: String::new(),
            transaction_type: String::new(),
            amount,
            wallet_balance: None,
            status: TransactionStatus::default(),
            category: None,
            is_abnormal: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Category label with blanks folded into [`UNCATEGORIZED`].
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Scope of a stored budget: the global mapping or a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetPeriod {
    Global,
    Month { year: i32, month: u32 },
}

impl BudgetPeriod {
    /// Storage key: `global` or `YYYY_M` (month not zero-padded).
    pub fn key(&self) -> String {
        match self {
            BudgetPeriod::Global => "global".to_string(),
            BudgetPeriod::Month { year, month } => format!("{}_{}", year, month),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for BudgetPeriod {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("global") {
            return Ok(BudgetPeriod::Global);
        }
        let bad = || AnalyticsError::invalid("period", format!("'{}' is not 'global' or YYYY_M", s));
        let (y, m) = s.split_once('_').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        if !(1..=12).contains(&month) {
            return Err(bad());
        }
        Ok(BudgetPeriod::Month { year, month })
    }
}
