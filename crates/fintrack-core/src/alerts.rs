//! Threshold checks feeding budget and savings notifications.
//!
//! Only the alert level and the relevant amount are computed here; message
//! wording belongs to the presentation layer.

use chrono::NaiveDate;
use serde::Serialize;

use fintrack_domain::{RecurringTransaction, SavingsVaultGoal};

use crate::upcoming::{upcoming, UpcomingDue};

pub const DEFAULT_BUDGET_LOW_PERCENT: f64 = 10.0;
pub const DEFAULT_SAVINGS_NUDGE_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BudgetAlert {
    /// Expenses exceed income by `overspent`.
    Exceeded { overspent: f64 },
    /// Less than the low threshold of income is left.
    Low { remaining: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SavingsNudge {
    AlmostThere { remaining: f64 },
    Achieved { saved: f64 },
}

/// Checks a month's income against its expenses.
pub fn budget_alert(
    total_income: f64,
    total_expenses: f64,
    low_threshold_percent: f64,
) -> Option<BudgetAlert> {
    let remaining = total_income - total_expenses;
    if remaining < 0.0 {
        return Some(BudgetAlert::Exceeded {
            overspent: remaining.abs(),
        });
    }
    let percent_left = if total_income > 0.0 {
        remaining / total_income * 100.0
    } else {
        0.0
    };
    if percent_left > 0.0 && percent_left < low_threshold_percent {
        Some(BudgetAlert::Low { remaining })
    } else {
        None
    }
}

pub fn savings_nudge(goal: &SavingsVaultGoal, nudge_threshold_percent: f64) -> Option<SavingsNudge> {
    let progress = goal.progress_percent();
    if progress >= 100.0 {
        Some(SavingsNudge::Achieved {
            saved: goal.current_amount,
        })
    } else if progress >= nudge_threshold_percent {
        Some(SavingsNudge::AlmostThere {
            remaining: goal.target_amount - goal.current_amount,
        })
    } else {
        None
    }
}

/// Templates due within the reminder window.
pub fn recurring_reminders(
    templates: &[RecurringTransaction],
    today: NaiveDate,
    days_ahead: u32,
) -> Vec<UpcomingDue<'_>> {
    upcoming(templates, today, days_ahead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn goal(target: f64, current: f64) -> SavingsVaultGoal {
        SavingsVaultGoal {
            id: "g".into(),
            title: "Emergency".into(),
            target_amount: target,
            current_amount: current,
            deadline: None,
            created_at: Utc::now(),
            deposits: Vec::new(),
            is_completed: current >= target,
        }
    }

    #[test]
    fn budget_alert_levels() {
        assert_eq!(
            budget_alert(1000.0, 1200.0, DEFAULT_BUDGET_LOW_PERCENT),
            Some(BudgetAlert::Exceeded { overspent: 200.0 })
        );
        assert_eq!(
            budget_alert(1000.0, 950.0, DEFAULT_BUDGET_LOW_PERCENT),
            Some(BudgetAlert::Low { remaining: 50.0 })
        );
        assert_eq!(budget_alert(1000.0, 500.0, DEFAULT_BUDGET_LOW_PERCENT), None);
        assert_eq!(budget_alert(1000.0, 1000.0, DEFAULT_BUDGET_LOW_PERCENT), None);
        assert_eq!(budget_alert(0.0, 0.0, DEFAULT_BUDGET_LOW_PERCENT), None);
    }

    #[test]
    fn savings_nudge_levels() {
        assert_eq!(savings_nudge(&goal(1000.0, 500.0), DEFAULT_SAVINGS_NUDGE_PERCENT), None);
        assert_eq!(
            savings_nudge(&goal(1000.0, 950.0), DEFAULT_SAVINGS_NUDGE_PERCENT),
            Some(SavingsNudge::AlmostThere { remaining: 50.0 })
        );
        assert_eq!(
            savings_nudge(&goal(1000.0, 1100.0), DEFAULT_SAVINGS_NUDGE_PERCENT),
            Some(SavingsNudge::Achieved { saved: 1100.0 })
        );
    }
}
