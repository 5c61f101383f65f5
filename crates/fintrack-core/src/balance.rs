//! Month totals and carry-forward balances over manual and recurring records.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use fintrack_domain::{
    total_amount, Dated, Expense, Income, MonthScope, MonthWindow, RecurringTransaction,
};

use crate::expansion::{expand, expand_with_cutoff};

/// Realized activity of a single month, manual records first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: MonthWindow,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
}

impl MonthSummary {
    pub fn empty(month: MonthWindow) -> Self {
        Self {
            month,
            total_income: 0.0,
            total_expenses: 0.0,
            balance: 0.0,
            incomes: Vec::new(),
            expenses: Vec::new(),
        }
    }

    fn from_records(month: MonthWindow, incomes: Vec<Income>, expenses: Vec<Expense>) -> Self {
        let total_income = total_amount(&incomes);
        let total_expenses = total_amount(&expenses);
        Self {
            month,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            incomes,
            expenses,
        }
    }
}

/// Month summary plus the balance carried in from every earlier month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub previous_balance: f64,
    pub summary: MonthSummary,
    pub total_balance: f64,
}

pub struct BalanceService;

impl BalanceService {
    /// Totals for `month` as of `today`.
    ///
    /// Months starting after `today` have no realized activity and come back
    /// empty. In the month containing `today`, recurring occurrences after
    /// `today` are left out; manual records are taken as entered.
    pub fn month_summary(
        incomes: &[Income],
        expenses: &[Expense],
        templates: &[RecurringTransaction],
        month: &MonthWindow,
        today: NaiveDate,
    ) -> MonthSummary {
        let scope = month.scope(today);
        if scope == MonthScope::Future {
            return MonthSummary::empty(*month);
        }

        let generated = expand(templates, month, today, scope == MonthScope::Current);

        let mut month_incomes = within(incomes, month);
        month_incomes.extend(generated.incomes);
        let mut month_expenses = within(expenses, month);
        month_expenses.extend(generated.expenses);

        MonthSummary::from_records(*month, month_incomes, month_expenses)
    }

    /// Net of everything dated strictly before `month.start`.
    ///
    /// Recurring templates are expanded in full for every month from the
    /// earliest known date (manual record or template start) up to the month
    /// before `month`. Returns 0 when there is no history at all.
    pub fn previous_balance(
        incomes: &[Income],
        expenses: &[Expense],
        templates: &[RecurringTransaction],
        month: &MonthWindow,
    ) -> f64 {
        let prior_incomes = before(incomes, month.start);
        let prior_expenses = before(expenses, month.start);

        let earliest = prior_incomes
            .iter()
            .map(|income| income.date)
            .chain(prior_expenses.iter().map(|expense| expense.date))
            .chain(templates.iter().map(|template| template.start_date))
            .min();
        let Some(earliest) = earliest else {
            return 0.0;
        };

        let mut recurring_income = 0.0;
        let mut recurring_expenses = 0.0;
        let mut cursor = MonthWindow::containing(earliest);
        let mut walked = 0usize;
        while cursor.start < month.start {
            let generated = expand_with_cutoff(templates, &cursor, None);
            recurring_income += generated.income_total();
            recurring_expenses += generated.expense_total();
            walked += 1;

            let next = cursor.next();
            if next == cursor {
                break;
            }
            cursor = next;
        }

        let manual_income: f64 = prior_incomes.iter().map(|income| income.amount).sum();
        let manual_expenses: f64 = prior_expenses.iter().map(|expense| expense.amount).sum();
        debug!(
            month = %month,
            months_walked = walked,
            manual_income,
            manual_expenses,
            recurring_income,
            recurring_expenses,
            "computed carry-forward balance"
        );

        (manual_income + recurring_income) - (manual_expenses + recurring_expenses)
    }

    /// Previous balance, month summary and their sum.
    pub fn balance_sheet(
        incomes: &[Income],
        expenses: &[Expense],
        templates: &[RecurringTransaction],
        month: &MonthWindow,
        today: NaiveDate,
    ) -> BalanceSheet {
        let previous_balance = Self::previous_balance(incomes, expenses, templates, month);
        let summary = Self::month_summary(incomes, expenses, templates, month, today);
        let total_balance = previous_balance + summary.balance;
        BalanceSheet {
            previous_balance,
            summary,
            total_balance,
        }
    }
}

fn within<T: Dated + Clone>(records: &[T], month: &MonthWindow) -> Vec<T> {
    records
        .iter()
        .filter(|record| month.contains(record.date()))
        .cloned()
        .collect()
}

fn before<T: Dated>(records: &[T], cutoff: NaiveDate) -> Vec<&T> {
    records
        .iter()
        .filter(|record| record.date() < cutoff)
        .collect()
}
