// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flags expenses that sit well above their category's usual spend.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::debug;

use super::aggregate::parse_transaction_date;
use crate::error::Result;
use crate::models::Transaction;

/// Categories with fewer expenses than this are never classified.
pub const MIN_CATEGORY_SAMPLES: usize = 3;

/// Standard deviations above the mean before an expense is abnormal.
pub const STD_DEV_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyThreshold {
    pub mean: f64,
    /// Population standard deviation (divides by N).
    pub std_dev: f64,
    pub threshold: f64,
    pub sample_size: usize,
}

impl AnomalyThreshold {
    fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        AnomalyThreshold {
            mean,
            std_dev,
            threshold: mean + STD_DEV_MULTIPLIER * std_dev,
            sample_size: samples.len(),
        }
    }

    pub fn is_exceeded_by(&self, magnitude: f64) -> bool {
        magnitude > self.threshold
    }
}

fn magnitude(tx: &Transaction) -> f64 {
    tx.amount.abs().to_f64().unwrap_or(0.0)
}

/// Per-category thresholds for every category with enough expenses.
pub fn category_thresholds(transactions: &[Transaction]) -> BTreeMap<String, AnomalyThreshold> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        groups
            .entry(tx.category_label())
            .or_default()
            .push(magnitude(tx));
    }
    groups
        .into_iter()
        .filter(|(_, samples)| samples.len() >= MIN_CATEGORY_SAMPLES)
        .map(|(category, samples)| {
            (
                category.to_string(),
                AnomalyThreshold::from_samples(&samples),
            )
        })
        .collect()
}

/// Return a copy of `transactions` with `is_abnormal` recomputed.
///
/// Income and expenses in small categories always come back unflagged.
pub fn classify_anomalies(transactions: &[Transaction]) -> Vec<Transaction> {
    let thresholds = category_thresholds(transactions);
    let classified: Vec<Transaction> = transactions
        .iter()
        .map(|tx| {
            let mut out = tx.clone();
            out.is_abnormal = tx.is_expense()
                && thresholds
                    .get(tx.category_label())
                    .is_some_and(|t| t.is_exceeded_by(magnitude(tx)));
            out
        })
        .collect();
    debug!(
        transactions = transactions.len(),
        classified_categories = thresholds.len(),
        flagged = classified.iter().filter(|t| t.is_abnormal).count(),
        "classified spending anomalies"
    );
    classified
}

/// Like [`classify_anomalies`], but each calendar month is its own window.
///
/// Output keeps input order. Fails on the first unparseable date.
pub fn classify_by_month(transactions: &[Transaction]) -> Result<Vec<Transaction>> {
    let mut months: BTreeMap<(i32, u32), Vec<usize>> = BTreeMap::new();
    for (i, tx) in transactions.iter().enumerate() {
        let date = parse_transaction_date(&tx.id, &tx.date)?;
        months
            .entry((date.year(), date.month()))
            .or_default()
            .push(i);
    }
    let mut out = transactions.to_vec();
    for indices in months.values() {
        let window: Vec<Transaction> = indices.iter().map(|&i| transactions[i].clone()).collect();
        for (&i, classified) in indices.iter().zip(classify_anomalies(&window)) {
            out[i] = classified;
        }
    }
    Ok(out)
}
