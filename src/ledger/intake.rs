use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::days_back;

use super::goal::Goal;

/// Minimum amount a day needs for it to count toward the streak.
pub const MIN_FOR_STREAK: u32 = 1000;

/// In-memory form of the persisted state. Owns every record mutation, while
/// persistence stays with [LedgerStore](super::store::LedgerStore) so the
/// ledger itself can be tested in isolation.
///
/// A day with no key recorded nothing. Amounts are always positive because
/// [IntakeLedger::add_volume] drops zero and [IntakeLedger::reset_day]
/// removes the key instead of writing 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeLedger {
    records: BTreeMap<NaiveDate, u32>,
    #[serde(rename = "lastRemind", with = "chrono::serde::ts_milliseconds")]
    last_remind: DateTime<Utc>,
}

impl Default for IntakeLedger {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            last_remind: DateTime::UNIX_EPOCH,
        }
    }
}

impl IntakeLedger {
    /// Adds to the day's entry, creating it when absent. A zero amount is
    /// dropped without a word, the same way interactive input that fails to
    /// parse is dropped.
    pub fn add_volume(&mut self, day: NaiveDate, amount_ml: u32) {
        if amount_ml == 0 {
            return;
        }
        *self.records.entry(day).or_insert(0) += amount_ml;
    }

    pub fn total_for(&self, day: NaiveDate) -> u32 {
        self.records.get(&day).copied().unwrap_or(0)
    }

    /// Share of the goal reached on `day`, clamped into 0..=100.
    pub fn percent_of_goal(&self, day: NaiveDate, goal: Goal) -> u32 {
        let percent = (f64::from(self.total_for(day)) / f64::from(goal.ml()) * 100.).round();
        (percent as u32).min(100)
    }

    /// Consecutive qualifying days ending at `today`. Today itself counts
    /// only once it has reached [MIN_FOR_STREAK], so a fresh day reads 0
    /// until enough water is logged, even if yesterday qualified.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut day = today;
        while self.total_for(day) >= MIN_FOR_STREAK {
            streak += 1;
            day = day - Duration::days(1);
        }
        streak
    }

    /// Mean over today and the 6 days before it, counting only days that
    /// actually have a record. Empty days don't drag the average down.
    pub fn weekly_average(&self, today: NaiveDate) -> u32 {
        let (sum, count) = days_back(today, 7)
            .filter_map(|day| self.records.get(&day))
            .filter(|amount| **amount > 0)
            .fold((0u64, 0u64), |(sum, count), amount| {
                (sum + u64::from(*amount), count + 1)
            });
        if count == 0 {
            0
        } else {
            (sum as f64 / count as f64).round() as u32
        }
    }

    /// Deletes the day's entry. No-op when nothing was recorded.
    pub fn reset_day(&mut self, day: NaiveDate) {
        self.records.remove(&day);
    }

    /// The most recent `days` days, newest first. The iterator borrows the
    /// ledger and can be recreated as often as the caller likes.
    pub fn history(
        &self,
        newest: NaiveDate,
        days: u32,
    ) -> impl Iterator<Item = DayRecord> + Clone + '_ {
        days_back(newest, days).map(move |date| {
            let amount_ml = self.total_for(date);
            DayRecord {
                date,
                amount_ml,
                qualifies: amount_ml >= MIN_FOR_STREAK,
            }
        })
    }

    pub fn last_remind(&self) -> DateTime<Utc> {
        self.last_remind
    }

    pub fn set_last_remind(&mut self, at: DateTime<Utc>) {
        self.last_remind = at;
    }
}

/// One row of the recent-history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub amount_ml: u32,
    pub qualifies: bool,
}
