//! Derived views for charts: category split, per-day series, month deltas.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use fintrack_domain::{Expense, ExpenseCategory, Income, MonthWindow};

use crate::balance::MonthSummary;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyData {
    pub date: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthComparison {
    pub income_delta: f64,
    pub expense_delta: f64,
    /// `None` when the previous month had no income.
    pub income_change_percent: Option<f64>,
    /// `None` when the previous month had no expenses.
    pub expense_change_percent: Option<f64>,
}

/// Expense totals per category; categories without spending are absent.
pub fn category_breakdown(expenses: &[Expense]) -> BTreeMap<ExpenseCategory, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }
    totals
}

/// One entry per day of `month`; records outside the month are ignored.
pub fn daily_series(month: &MonthWindow, incomes: &[Income], expenses: &[Expense]) -> Vec<DailyData> {
    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> =
        month.days().map(|day| (day, (0.0, 0.0))).collect();

    for income in incomes {
        if let Some(entry) = by_day.get_mut(&income.date) {
            entry.0 += income.amount;
        }
    }
    for expense in expenses {
        if let Some(entry) = by_day.get_mut(&expense.date) {
            entry.1 += expense.amount;
        }
    }

    by_day
        .into_iter()
        .map(|(date, (income, expenses))| DailyData {
            date,
            income,
            expenses,
            balance: income - expenses,
        })
        .collect()
}

pub fn month_comparison(current: &MonthSummary, previous: &MonthSummary) -> MonthComparison {
    MonthComparison {
        income_delta: current.total_income - previous.total_income,
        expense_delta: current.total_expenses - previous.total_expenses,
        income_change_percent: percent_change(previous.total_income, current.total_income),
        expense_change_percent: percent_change(previous.total_expenses, current.total_expenses),
    }
}

fn percent_change(before: f64, after: f64) -> Option<f64> {
    (before != 0.0).then(|| (after - before) / before * 100.0)
}
