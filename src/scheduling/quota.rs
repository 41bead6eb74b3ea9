//! Meeting quotas
//!
//! A host's program may cap how many meetings (reserved or pending) the host
//! takes per day, per week (Monday to Sunday) and per calendar month. Counts are
//! taken across all of the host's programs; the limits come from the program of
//! the slot being booked.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaScope {
    Daily,
    Weekly,
    Monthly,
}

impl QuotaScope {
    /// Inclusive date range covered by this scope around `date`
    pub fn range(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            QuotaScope::Daily => (date, date),
            QuotaScope::Weekly => week_range(date),
            QuotaScope::Monthly => month_range(date),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuotaScope::Daily => "daily",
            QuotaScope::Weekly => "weekly",
            QuotaScope::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for QuotaScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaScope::Daily => write!(f, "Daily"),
            QuotaScope::Weekly => write!(f, "Weekly"),
            QuotaScope::Monthly => write!(f, "Monthly"),
        }
    }
}

/// Monday..Sunday of the week containing `date`
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (start, start + Duration::days(6))
}

/// First..last day of the month containing `date`
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(first);
    (first, last)
}

/// Caps configured on a program; `None` means unlimited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLimits {
    pub daily: Option<i64>,
    pub weekly: Option<i64>,
    pub monthly: Option<i64>,
}

impl QuotaLimits {
    pub fn get(&self, scope: QuotaScope) -> Option<i64> {
        match scope {
            QuotaScope::Daily => self.daily,
            QuotaScope::Weekly => self.weekly,
            QuotaScope::Monthly => self.monthly,
        }
    }
}

/// Meetings a host already holds in each scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaCounts {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
}

impl QuotaCounts {
    pub fn get(&self, scope: QuotaScope) -> i64 {
        match scope {
            QuotaScope::Daily => self.daily,
            QuotaScope::Weekly => self.weekly,
            QuotaScope::Monthly => self.monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum QuotaDecision {
    /// The booking fits; `cascade` names the scope this booking exhausts, if any
    Admit { cascade: Option<QuotaScope> },
    /// A scope is already full
    Reject { breached: QuotaScope },
}

const EVALUATION_ORDER: [QuotaScope; 3] = [QuotaScope::Daily, QuotaScope::Weekly, QuotaScope::Monthly];

/// Decide whether one more meeting fits under the limits
pub fn evaluate_reservation(limits: &QuotaLimits, counts: &QuotaCounts) -> QuotaDecision {
    let breached = EVALUATION_ORDER.iter().copied().find(|scope| {
        limits.get(*scope).is_some_and(|limit| counts.get(*scope) >= limit)
    });

    if let Some(breached) = breached {
        return QuotaDecision::Reject { breached };
    }

    let cascade = EVALUATION_ORDER.iter().copied().find(|scope| {
        limits.get(*scope) == Some(counts.get(*scope) + 1)
    });

    QuotaDecision::Admit { cascade }
}

/// Widest scope whose limit has been reached, checked monthly first
pub fn first_exhausted_scope(limits: &QuotaLimits, counts: &QuotaCounts) -> Option<QuotaScope> {
    EVALUATION_ORDER.iter().rev().copied().find(|scope| {
        limits.get(*scope).is_some_and(|limit| counts.get(*scope) >= limit)
    })
}
