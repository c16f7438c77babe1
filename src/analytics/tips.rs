// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-based cost-cutting advice.

use rust_decimal::Decimal;

use crate::models::{Budget, CategoryTotals, Transaction};

/// Expenses below this magnitude count as "small".
pub const SMALL_EXPENSE_LIMIT: Decimal = Decimal::TEN;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TipStats {
    pub total_spending: Decimal,
    pub small_expense_count: usize,
}

impl TipStats {
    /// Count small expenses in an already period-filtered window.
    pub fn from_transactions(transactions: &[Transaction], total_spending: Decimal) -> Self {
        TipStats {
            total_spending,
            small_expense_count: transactions
                .iter()
                .filter(|tx| tx.is_expense() && tx.amount.abs() < SMALL_EXPENSE_LIMIT)
                .count(),
        }
    }
}

fn pct(value: Decimal, percent: i64) -> Decimal {
    value * Decimal::new(percent, 2)
}

/// Advice strings in category order, followed by the two global rules.
///
/// A period with no spending yields a single congratulation and nothing else.
/// A zero limit counts as no budget.
pub fn generate_cost_cutting_tips(
    totals: &CategoryTotals,
    budget: &Budget,
    stats: &TipStats,
) -> Vec<String> {
    if stats.total_spending.is_zero() {
        return vec![
            "No spending recorded this period. Great job keeping your wallet closed!".to_string(),
        ];
    }
    let total = stats.total_spending.abs();
    let mut tips = Vec::new();

    for (category, amount) in totals {
        let spent = amount.abs();
        match budget.get(category).filter(|l| **l > Decimal::ZERO) {
            Some(limit) if spent > pct(*limit, 110) => tips.push(format!(
                "You exceeded your {} budget ({:.2} of {:.2}). Look for purchases to cut back on next month.",
                category, spent, limit
            )),
            Some(limit) if spent >= pct(*limit, 80) => tips.push(format!(
                "You are close to your {} budget ({:.2} of {:.2}). Slow down for the rest of the month.",
                category, spent, limit
            )),
            Some(_) => {}
            None if spent > pct(total, 30) => tips.push(format!(
                "{} makes up {:.0}% of your spending. Consider setting a budget for it.",
                category,
                spent / total * Decimal::ONE_HUNDRED
            )),
            None => {}
        }
    }

    let active = totals.values().filter(|v| !v.is_zero()).count();
    if active <= 1 && total > Decimal::from(50) {
        tips.push(
            "All of your spending sits in one category. Review whether it can be spread out or reduced."
                .to_string(),
        );
    }
    if stats.small_expense_count > 10 {
        tips.push(format!(
            "You made {} purchases under {}. Small transactions add up quickly.",
            stats.small_expense_count, SMALL_EXPENSE_LIMIT
        ));
    }
    tips
}
