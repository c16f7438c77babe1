// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Future-savings projection under randomized ROI and salary growth.
//!
//! Each simulated year draws one annual ROI from `[roi_min, roi_max]`, applies
//! it monthly after the month's net saving is added, and every
//! `increment_frequency_years` grows the monthly saving by a rate drawn from
//! `[salary_increment_min, salary_increment_max]`.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};

/// Uniform draws in `[min, max]`, injectable so runs can be reproduced.
pub trait RandomSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        (**self).uniform(min, max)
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        min
    } else {
        rng.random_range(min..=max)
    }
}

/// OS-seeded thread-local generator.
pub struct ThreadRandom(ThreadRng);

impl ThreadRandom {
    pub fn new() -> Self {
        ThreadRandom(rand::rng())
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        draw(&mut self.0, min, max)
    }
}

/// Reproducible generator seeded from a `u64`.
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        draw(&mut self.0, min, max)
    }
}

/// Returns the same value for every draw, ignoring the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn uniform(&mut self, _min: f64, _max: f64) -> f64 {
        self.0
    }
}

/// Adapts a closure `(min, max) -> value`.
pub struct FnRandom<F>(pub F);

impl<F: FnMut(f64, f64) -> f64> RandomSource for FnRandom<F> {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        (self.0)(min, max)
    }
}

/// Longest horizon a projection accepts.
pub const MAX_YEARS: u32 = 1_000;

/// Most repetitions `simulate_many` will run.
pub const MAX_RUNS: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParameters {
    pub monthly_saving: f64,
    pub monthly_expenses: f64,
    pub years: u32,
    pub include_roi: bool,
    /// Annual percentage, e.g. `4.0` for 4%.
    pub roi_min: f64,
    pub roi_max: f64,
    pub include_salary_increment: bool,
    pub salary_increment_min: f64,
    pub salary_increment_max: f64,
    pub increment_frequency_years: u32,
}

impl ProjectionParameters {
    /// Plain saving with no growth of any kind.
    pub fn flat(monthly_saving: f64, monthly_expenses: f64, years: u32) -> Self {
        ProjectionParameters {
            monthly_saving,
            monthly_expenses,
            years,
            include_roi: false,
            roi_min: 0.0,
            roi_max: 0.0,
            include_salary_increment: false,
            salary_increment_min: 0.0,
            salary_increment_max: 0.0,
            increment_frequency_years: 1,
        }
    }

    pub fn with_roi(mut self, min: f64, max: f64) -> Self {
        self.include_roi = true;
        self.roi_min = min;
        self.roi_max = max;
        self
    }

    pub fn with_salary_increment(mut self, min: f64, max: f64, every_years: u32) -> Self {
        self.include_salary_increment = true;
        self.salary_increment_min = min;
        self.salary_increment_max = max;
        self.increment_frequency_years = every_years;
        self
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("monthly_saving", self.monthly_saving)?;
        non_negative("monthly_expenses", self.monthly_expenses)?;
        if self.years == 0 {
            return Err(AnalyticsError::invalid("years", "must be at least 1"));
        }
        if self.years > MAX_YEARS {
            return Err(AnalyticsError::invalid(
                "years",
                format!("must be at most {}", MAX_YEARS),
            ));
        }
        if self.include_roi {
            finite("roi_min", self.roi_min)?;
            finite("roi_max", self.roi_max)?;
            ordered("roi", self.roi_min, self.roi_max)?;
        }
        if self.include_salary_increment {
            finite("salary_increment_min", self.salary_increment_min)?;
            finite("salary_increment_max", self.salary_increment_max)?;
            ordered(
                "salary_increment",
                self.salary_increment_min,
                self.salary_increment_max,
            )?;
            if self.increment_frequency_years == 0 {
                return Err(AnalyticsError::invalid(
                    "increment_frequency_years",
                    "must be at least 1",
                ));
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(AnalyticsError::invalid(field, format!("{} is not a finite number", v)))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<()> {
    finite(field, v)?;
    if v < 0.0 {
        return Err(AnalyticsError::invalid(field, "must not be negative"));
    }
    Ok(())
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(AnalyticsError::InvalidRange { field, min, max });
    }
    // uniform sampling needs a representable width
    if !(max - min).is_finite() {
        return Err(AnalyticsError::invalid(
            field,
            format!("range {} to {} is too wide", min, max),
        ));
    }
    Ok(())
}

/// Form input as typed by a user, before any parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProjectionInput {
    pub monthly_saving: String,
    pub monthly_expenses: String,
    pub years: String,
    pub include_roi: bool,
    pub roi_min: String,
    pub roi_max: String,
    pub include_salary_increment: bool,
    pub salary_increment_min: String,
    pub salary_increment_max: String,
    pub increment_frequency_years: String,
}

impl Default for RawProjectionInput {
    fn default() -> Self {
        RawProjectionInput {
            monthly_saving: String::new(),
            monthly_expenses: String::new(),
            years: "10".into(),
            include_roi: true,
            roi_min: "4".into(),
            roi_max: "8".into(),
            include_salary_increment: true,
            salary_increment_min: "10".into(),
            salary_increment_max: "30".into(),
            increment_frequency_years: "2".into(),
        }
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64> {
    let v: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AnalyticsError::invalid(field, format!("'{}' is not a number", raw)))?;
    finite(field, v)?;
    Ok(v)
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32> {
    let v: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AnalyticsError::invalid(field, format!("'{}' is not a whole number", raw)))?;
    if v <= 0 {
        return Err(AnalyticsError::invalid(field, "must be at least 1"));
    }
    u32::try_from(v).map_err(|_| AnalyticsError::invalid(field, format!("{} is too large", v)))
}

impl RawProjectionInput {
    /// Parse and validate. Fields of a disabled feature are not read.
    pub fn parse(&self) -> Result<ProjectionParameters> {
        let mut params = ProjectionParameters::flat(
            parse_number("monthly_saving", &self.monthly_saving)?,
            parse_number("monthly_expenses", &self.monthly_expenses)?,
            parse_count("years", &self.years)?,
        );
        if self.include_roi {
            params = params.with_roi(
                parse_number("roi_min", &self.roi_min)?,
                parse_number("roi_max", &self.roi_max)?,
            );
        }
        if self.include_salary_increment {
            params = params.with_salary_increment(
                parse_number("salary_increment_min", &self.salary_increment_min)?,
                parse_number("salary_increment_max", &self.salary_increment_max)?,
                parse_count("increment_frequency_years", &self.increment_frequency_years)?,
            );
        }
        params.validate()?;
        Ok(params)
    }
}

/// Simulate one projection and return the final balance.
pub fn project_future_savings(
    params: &ProjectionParameters,
    rng: &mut dyn RandomSource,
) -> Result<f64> {
    params.validate()?;

    let mut total = 0.0_f64;
    let mut current_saving = params.monthly_saving;

    for year in 1..=params.years {
        let annual_roi = if params.include_roi {
            rng.uniform(params.roi_min, params.roi_max) / 100.0
        } else {
            0.0
        };

        for _month in 1..=12 {
            total += current_saving - params.monthly_expenses;
            total += total * (annual_roi / 12.0);
        }

        if params.include_salary_increment && year % params.increment_frequency_years == 0 {
            let increment_rate =
                rng.uniform(params.salary_increment_min, params.salary_increment_max) / 100.0;
            current_saving += current_saving * increment_rate;
        }
    }

    Ok(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub runs: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

impl ProjectionSummary {
    fn from_totals(mut totals: Vec<f64>) -> Self {
        totals.sort_by(|a, b| a.total_cmp(b));
        let n = totals.len();
        let percentile = |p: f64| {
            let idx = ((p * n as f64).ceil() as usize).clamp(1, n) - 1;
            totals[idx]
        };
        ProjectionSummary {
            runs: n,
            mean: totals.iter().sum::<f64>() / n as f64,
            min: totals[0],
            max: totals[n - 1],
            p5: percentile(0.05),
            p50: percentile(0.50),
            p95: percentile(0.95),
        }
    }
}

const MAX_BATCH_SIZE: usize = 100;

fn run_batch(params: &ProjectionParameters, seed: u64, batch: usize, size: usize) -> Result<Vec<f64>> {
    let mut batch_rng = StdRng::seed_from_u64(seed.wrapping_add(batch as u64));
    (0..size)
        .map(|_| {
            let mut run_rng = SeededRandom::new(batch_rng.next_u64());
            project_future_savings(params, &mut run_rng)
        })
        .collect()
}

/// Repeat the projection `runs` times and summarize the spread of outcomes.
///
/// Runs are grouped in batches seeded from `seed`, so the result for a given
/// seed does not depend on how batches are scheduled.
pub fn simulate_many(params: &ProjectionParameters, runs: usize, seed: u64) -> Result<ProjectionSummary> {
    if runs == 0 {
        return Err(AnalyticsError::invalid("runs", "must be at least 1"));
    }
    if runs > MAX_RUNS {
        return Err(AnalyticsError::invalid(
            "runs",
            format!("must be at most {}", MAX_RUNS),
        ));
    }
    params.validate()?;

    let num_batches = runs.div_ceil(MAX_BATCH_SIZE);
    let batch_size = |i: usize| {
        if i == num_batches - 1 {
            runs - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        }
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Result<Vec<f64>>> = {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        (0..num_batches)
            .into_par_iter()
            .map(|i| run_batch(params, seed, i, batch_size(i)))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Result<Vec<f64>>> = (0..num_batches)
        .map(|i| run_batch(params, seed, i, batch_size(i)))
        .collect();

    let mut totals = Vec::with_capacity(runs);
    for batch in batches {
        totals.extend(batch?);
    }
    let summary = ProjectionSummary::from_totals(totals);
    debug!(runs, seed, p50 = summary.p50, "monte carlo projection finished");
    Ok(summary)
}
