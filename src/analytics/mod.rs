// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure analytics over in-memory transactions and budgets.

pub mod aggregate;
pub mod anomaly;
pub mod engagement;
pub mod projection;
pub mod tips;

pub use aggregate::{
    BudgetLevel, BudgetStatus, SpendingSummary, aggregate_category_totals, budget_statuses,
    filter_period, parse_transaction_date,
};
pub use anomaly::{
    AnomalyThreshold, MIN_CATEGORY_SAMPLES, STD_DEV_MULTIPLIER, category_thresholds,
    classify_anomalies, classify_by_month,
};
pub use engagement::{
    BADGES, BadgeDefinition, LoginOutcome, StreakPolicy, UserProgress, XP_PER_LEVEL, XP_PER_LOGIN,
    earned_badges,
};
pub use projection::{
    FixedDraw, FnRandom, MAX_RUNS, MAX_YEARS, ProjectionParameters, ProjectionSummary,
    RandomSource, RawProjectionInput, SeededRandom, ThreadRandom, project_future_savings,
    simulate_many,
};
pub use tips::{TipStats, generate_cost_cutting_tips};
