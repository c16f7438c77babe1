// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Badges and XP/level/streak progression.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::SpendingSummary;

pub const XP_PER_LOGIN: u32 = 10;
pub const XP_PER_LEVEL: u32 = 100;

pub struct BadgeDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    condition: fn(&SpendingSummary) -> bool,
}

impl BadgeDefinition {
    pub fn is_earned(&self, summary: &SpendingSummary) -> bool {
        (self.condition)(summary)
    }
}

fn tracked(summary: &SpendingSummary) -> Decimal {
    summary.total_spending.abs()
}

fn any_spending(s: &SpendingSummary) -> bool {
    tracked(s) > Decimal::ZERO
}

fn tracked_50(s: &SpendingSummary) -> bool {
    tracked(s) >= Decimal::from(50)
}

fn tracked_100(s: &SpendingSummary) -> bool {
    tracked(s) >= Decimal::ONE_HUNDRED
}

fn three_categories(s: &SpendingSummary) -> bool {
    s.category_totals.len() >= 3
}

pub static BADGES: [BadgeDefinition; 4] = [
    BadgeDefinition {
        id: "starter",
        label: "Budget Starter",
        icon: "💼",
        condition: any_spending,
    },
    BadgeDefinition {
        id: "saver50",
        label: "Tracked RM50",
        icon: "💰",
        condition: tracked_50,
    },
    BadgeDefinition {
        id: "saver100",
        label: "Tracked RM100",
        icon: "🏅",
        condition: tracked_100,
    },
    BadgeDefinition {
        id: "multi_category",
        label: "Multi-Category Spender",
        icon: "📊",
        condition: three_categories,
    },
];

/// Badges earned for a period, in catalogue order.
pub fn earned_badges(summary: &SpendingSummary) -> Vec<&'static BadgeDefinition> {
    BADGES.iter().filter(|b| b.is_earned(summary)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakPolicy {
    /// Logins closer together than this are ignored.
    pub cooldown: Duration,
    /// A login within this gap of the previous one extends the streak.
    pub streak_window: Duration,
}

impl Default for StreakPolicy {
    fn default() -> Self {
        StreakPolicy {
            cooldown: Duration::hours(20),
            streak_window: Duration::hours(48),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub xp: u32,
    pub level: u32,
    pub streak: u32,
    pub last_login: Option<DateTime<Utc>>,
}

impl Default for UserProgress {
    fn default() -> Self {
        UserProgress {
            xp: 0,
            level: 1,
            streak: 0,
            last_login: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoginOutcome {
    Unchanged,
    Rewarded { xp_gained: u32, leveled_up: bool },
}

impl UserProgress {
    pub fn register_login(&mut self, now: DateTime<Utc>, policy: &StreakPolicy) -> LoginOutcome {
        let gap = self.last_login.map(|last| now - last);
        if gap.is_some_and(|g| g < policy.cooldown) {
            return LoginOutcome::Unchanged;
        }

        self.xp += XP_PER_LOGIN;
        let leveled_up = self.xp >= self.level * XP_PER_LEVEL;
        if leveled_up {
            self.level += 1;
        }
        self.streak = match gap {
            Some(g) if g < policy.streak_window => self.streak + 1,
            _ => 1,
        };
        self.last_login = Some(now);

        LoginOutcome::Rewarded {
            xp_gained: XP_PER_LOGIN,
            leveled_up,
        }
    }

    /// XP accumulated toward the next level bar.
    pub fn xp_into_level(&self) -> u32 {
        self.xp % XP_PER_LEVEL
    }
}
