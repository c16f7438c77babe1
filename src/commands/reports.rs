// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use crate::analytics::{
    AnomalyThreshold, BudgetStatus, SpendingSummary, TipStats, aggregate_category_totals,
    budget_statuses, category_thresholds, classify_anomalies, filter_period,
    generate_cost_cutting_tips,
};
use crate::db::{BudgetSource, TransactionSource};
use crate::models::{Budget, BudgetPeriod, Transaction};
use crate::utils::{currency, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("dashboard", sub)) => dashboard(conn, sub)?,
        Some(("anomalies", sub)) => anomalies(conn, sub)?,
        Some(("tips", sub)) => tips(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Everything a monthly report needs, loaded once.
pub struct PeriodData {
    pub month: u32,
    pub year: i32,
    pub window: Vec<Transaction>,
    pub summary: SpendingSummary,
    pub budget: Budget,
}

pub fn load_period(conn: &Connection, sub: &clap::ArgMatches) -> Result<PeriodData> {
    let (month, year) = super::resolve_period(sub);
    let include_income = sub.get_flag("include_income") || crate::utils::include_income(conn)?;
    let all = conn.list_transactions()?;
    let summary = aggregate_category_totals(&all, month, year, include_income)?;
    let window = filter_period(&all, month, year)?;
    let budget = conn.budget_for(&BudgetPeriod::Month { year, month })?;
    Ok(PeriodData {
        month,
        year,
        window,
        summary,
        budget,
    })
}

#[derive(Serialize)]
pub struct DashboardReport {
    pub month: u32,
    pub year: i32,
    pub total_spending: Decimal,
    pub categories: Vec<BudgetStatus>,
}

pub fn dashboard_report(data: &PeriodData) -> DashboardReport {
    DashboardReport {
        month: data.month,
        year: data.year,
        total_spending: data.summary.total_spending,
        categories: budget_statuses(&data.summary.category_totals, &data.budget),
    }
}

fn dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = load_period(conn, sub)?;
    let report = dashboard_report(&data);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = currency(conn)?;
    let rows: Vec<Vec<String>> = report
        .categories
        .iter()
        .map(|s| {
            vec![
                s.category.clone(),
                format!("{:.2}", s.spent),
                s.limit.map(|l| format!("{:.2}", l)).unwrap_or_default(),
                s.progress
                    .map(|p| format!("{:.0}%", p * Decimal::ONE_HUNDRED))
                    .unwrap_or_default(),
                format!("{:.1}%", s.share),
                match (s.over_budget, s.level) {
                    (true, _) => "Over Budget 😱".to_string(),
                    (false, Some(level)) => format!("Within Budget {}", level.emoji()),
                    (false, None) => String::new(),
                },
            ]
        })
        .collect();
    println!(
        "Total spending {:02}/{}: {}",
        report.month,
        report.year,
        fmt_money(&report.total_spending.abs(), &ccy)
    );
    println!(
        "{}",
        pretty_table(
            &["Category", "Spent", "Budget", "Used", "Share", "Status"],
            rows
        )
    );
    Ok(())
}

#[derive(Serialize)]
pub struct AnomalyReport {
    pub month: u32,
    pub year: i32,
    pub thresholds: BTreeMap<String, AnomalyThreshold>,
    pub abnormal: Vec<Transaction>,
}

pub fn anomaly_report(data: &PeriodData) -> AnomalyReport {
    AnomalyReport {
        month: data.month,
        year: data.year,
        thresholds: category_thresholds(&data.window),
        abnormal: classify_anomalies(&data.window)
            .into_iter()
            .filter(|t| t.is_abnormal)
            .collect(),
    }
}

fn anomalies(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = load_period(conn, sub)?;
    let report = anomaly_report(&data);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let thresholds: Vec<Vec<String>> = report
        .thresholds
        .iter()
        .map(|(c, t)| {
            vec![
                c.clone(),
                t.sample_size.to_string(),
                format!("{:.2}", t.mean),
                format!("{:.2}", t.std_dev),
                format!("{:.2}", t.threshold),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Expenses", "Mean", "Std Dev", "Threshold"], thresholds)
    );
    if report.abnormal.is_empty() {
        println!("No abnormal expenses for {:02}/{}", report.month, report.year);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = report
        .abnormal
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.date.clone(),
                t.description.clone(),
                t.category_label().to_string(),
                format!("{:.2}", t.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Description", "Category", "Amount"], rows)
    );
    Ok(())
}

pub fn tip_list(data: &PeriodData) -> Vec<String> {
    let stats = TipStats::from_transactions(&data.window, data.summary.total_spending);
    generate_cost_cutting_tips(&data.summary.category_totals, &data.budget, &stats)
}

fn tips(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = load_period(conn, sub)?;
    let tips = tip_list(&data);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tips)? {
        return Ok(());
    }
    for tip in tips {
        println!("• {}", tip);
    }
    Ok(())
}
