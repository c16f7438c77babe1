// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    LoginOutcome, StreakPolicy, XP_PER_LEVEL, aggregate_category_totals, earned_badges,
};
use crate::db::{TransactionSource, load_progress, save_progress};
use crate::utils::{include_income, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
pub struct BadgeView {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Serialize)]
pub struct ProgressReport {
    pub month: u32,
    pub year: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_into_level: u32,
    pub streak: u32,
    pub badges: Vec<BadgeView>,
}

pub fn progress_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<ProgressReport> {
    let (month, year) = super::resolve_period(sub);
    let all = conn.list_transactions()?;
    let summary = aggregate_category_totals(&all, month, year, include_income(conn)?)?;
    let progress = load_progress(conn)?;
    Ok(ProgressReport {
        month,
        year,
        level: progress.level,
        xp: progress.xp,
        xp_into_level: progress.xp_into_level(),
        streak: progress.streak,
        badges: earned_badges(&summary)
            .into_iter()
            .map(|b| BadgeView {
                id: b.id,
                label: b.label,
                icon: b.icon,
            })
            .collect(),
    })
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = progress_report(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    println!(
        "Level {} ({}/{} XP), streak {} day(s)",
        report.level, report.xp_into_level, XP_PER_LEVEL, report.streak
    );
    if report.badges.is_empty() {
        println!("No badges yet for {:02}/{}", report.month, report.year);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = report
        .badges
        .iter()
        .map(|b| vec![b.icon.to_string(), b.label.to_string()])
        .collect();
    println!("{}", pretty_table(&["", "Badge"], rows));
    Ok(())
}

/// Apply one login at `now` and persist the result.
pub fn check_in(conn: &Connection, now: DateTime<Utc>) -> Result<LoginOutcome> {
    let mut progress = load_progress(conn)?;
    let outcome = progress.register_login(now, &StreakPolicy::default());
    if let LoginOutcome::Rewarded { xp_gained, leveled_up } = outcome {
        save_progress(conn, &progress)?;
        info!(xp_gained, leveled_up, level = progress.level, streak = progress.streak, "check-in recorded");
    }
    Ok(outcome)
}

pub fn checkin(conn: &Connection) -> Result<()> {
    match check_in(conn, Utc::now())? {
        LoginOutcome::Unchanged => println!("Already checked in recently"),
        LoginOutcome::Rewarded { xp_gained, leveled_up } => {
            let progress = load_progress(conn)?;
            println!(
                "+{} XP, streak {} day(s){}",
                xp_gained,
                progress.streak,
                if leveled_up {
                    format!(", reached level {}", progress.level)
                } else {
                    String::new()
                }
            );
        }
    }
    Ok(())
}
