// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod badges;
pub mod budgets;
pub mod config;
pub mod doctor;
pub mod exporter;
pub mod importer;
pub mod projection;
pub mod reports;
pub mod transactions;

use chrono::{Datelike, Local};

/// `--month`/`--year` from the arguments, each defaulting to today.
pub fn resolve_period(sub: &clap::ArgMatches) -> (u32, i32) {
    let today = Local::now().date_naive();
    let month = sub.get_one::<u32>("month").copied().unwrap_or(today.month());
    let year = sub.get_one::<i32>("year").copied().unwrap_or(today.year());
    (month, year)
}

/// Like [`resolve_period`], but `None` when neither argument was given.
pub fn explicit_period(sub: &clap::ArgMatches) -> Option<(u32, i32)> {
    if sub.contains_id("month") || sub.contains_id("year") {
        Some(resolve_period(sub))
    } else {
        None
    }
}
