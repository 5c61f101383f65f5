//! Application facade: loads records from a [`FinanceStore`], runs the engine
//! with "today" taken from a [`Clock`], and writes mutated collections back.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use fintrack_config::{Config, ConfigManager};
use fintrack_core::{
    budget_alert, category_breakdown, daily_series, month_comparison, next_occurrence,
    recurring_reminders, savings_nudge,
    storage::{
        load_collection, save_collection, FinanceSnapshot, FinanceStore, EXPENSES_KEY, GOALS_KEY,
        INCOMES_KEY, RECURRING_KEY,
    },
    upcoming, BalanceService, BalanceSheet, BudgetAlert, Clock, DailyData, DepositOutcome,
    MonthComparison, RecordService, SavingsNudge, TemplateService, UpcomingDue, VaultService, VaultTotals,
};
use fintrack_domain::{
    DomainError, Expense, ExpenseCategory, Income, MonthWindow, RecurringTransaction,
    SavingsVaultGoal,
};
use fintrack_storage_json::JsonFileStore;

use crate::{clock::SystemClock, AppError};

/// A template with its next due date, detached from the loaded snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingEntry {
    pub template: RecurringTransaction,
    pub next_date: NaiveDate,
    pub days_until: i64,
}

/// A template as listed to the user, with its next due date if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateRow {
    pub template: RecurringTransaction,
    pub next_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthInsights {
    pub month: MonthWindow,
    pub categories: BTreeMap<ExpenseCategory, f64>,
    pub daily: Vec<DailyData>,
    pub comparison: MonthComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalNudge {
    pub goal_id: String,
    pub title: String,
    pub nudge: SavingsNudge,
}

/// Notifications due today, filtered by the user's notification switches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertReport {
    pub budget: Option<BudgetAlert>,
    pub savings: Vec<GoalNudge>,
    pub reminders: Vec<UpcomingEntry>,
}

impl AlertReport {
    pub fn is_empty(&self) -> bool {
        self.budget.is_none() && self.savings.is_empty() && self.reminders.is_empty()
    }
}

pub struct FinanceApp {
    store: Box<dyn FinanceStore>,
    clock: Box<dyn Clock>,
    config: Config,
}

impl FinanceApp {
    pub fn new(store: Box<dyn FinanceStore>, clock: Box<dyn Clock>, config: Config) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Opens the JSON store configured under the manager's base directory.
    pub fn open(manager: &ConfigManager) -> Result<Self, AppError> {
        let config = manager.load()?;
        let data_root = config.resolve_data_root(manager.base_dir());
        debug!(path = %data_root.display(), "opening JSON store");
        let store = JsonFileStore::new(data_root)?;
        Ok(Self::new(Box::new(store), Box::new(SystemClock), config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn current_month(&self) -> MonthWindow {
        MonthWindow::containing(self.today())
    }

    pub fn snapshot(&self) -> Result<FinanceSnapshot, AppError> {
        Ok(FinanceSnapshot::load(self.store.as_ref())?)
    }

    /// Balance sheet for `month`, defaulting to the current month.
    pub fn month_sheet(&self, month: Option<MonthWindow>) -> Result<BalanceSheet, AppError> {
        let month = month.unwrap_or_else(|| self.current_month());
        let snapshot = self.snapshot()?;
        Ok(BalanceService::balance_sheet(
            &snapshot.incomes,
            &snapshot.expenses,
            &snapshot.recurring,
            &month,
            self.today(),
        ))
    }

    /// Templates due within `days_ahead` days, defaulting to the configured window.
    pub fn upcoming(&self, days_ahead: Option<u32>) -> Result<Vec<UpcomingEntry>, AppError> {
        let days_ahead = days_ahead.unwrap_or(self.config.upcoming_days_ahead);
        let templates = self.templates()?;
        Ok(detach(upcoming(&templates, self.today(), days_ahead)))
    }

    pub fn templates(&self) -> Result<Vec<RecurringTransaction>, AppError> {
        Ok(load_collection(self.store.as_ref(), RECURRING_KEY)?)
    }

    pub fn template_rows(&self) -> Result<Vec<TemplateRow>, AppError> {
        let today = self.today();
        Ok(self
            .templates()?
            .into_iter()
            .map(|template| TemplateRow {
                next_date: if template.is_paused {
                    None
                } else {
                    next_occurrence(&template, today)
                },
                template,
            })
            .collect())
    }

    pub fn add_income(&self, income: Income) -> Result<Income, AppError> {
        ensure_amount(income.amount)?;
        let mut incomes: Vec<Income> = load_collection(self.store.as_ref(), INCOMES_KEY)?;
        incomes.push(income.clone());
        save_collection(self.store.as_ref(), INCOMES_KEY, &incomes)?;
        info!(id = %income.id, amount = income.amount, "income recorded");
        Ok(income)
    }

    pub fn add_expense(&self, expense: Expense) -> Result<Expense, AppError> {
        ensure_amount(expense.amount)?;
        if expense.name.trim().is_empty() {
            return Err(AppError::InvalidInput("expense name must not be empty".into()));
        }
        let mut expenses: Vec<Expense> = load_collection(self.store.as_ref(), EXPENSES_KEY)?;
        expenses.push(expense.clone());
        save_collection(self.store.as_ref(), EXPENSES_KEY, &expenses)?;
        info!(id = %expense.id, amount = expense.amount, "expense recorded");
        Ok(expense)
    }

    /// Deletes a manually entered income. Recurring occurrences are refused.
    pub fn delete_income(&self, income_id: &str) -> Result<Income, AppError> {
        let mut incomes: Vec<Income> = load_collection(self.store.as_ref(), INCOMES_KEY)?;
        let removed = RecordService::remove_income(&mut incomes, income_id)?;
        save_collection(self.store.as_ref(), INCOMES_KEY, &incomes)?;
        info!(id = income_id, "income deleted");
        Ok(removed)
    }

    pub fn delete_expense(&self, expense_id: &str) -> Result<Expense, AppError> {
        let mut expenses: Vec<Expense> = load_collection(self.store.as_ref(), EXPENSES_KEY)?;
        let removed = RecordService::remove_expense(&mut expenses, expense_id)?;
        save_collection(self.store.as_ref(), EXPENSES_KEY, &expenses)?;
        info!(id = expense_id, "expense deleted");
        Ok(removed)
    }

    pub fn add_recurring(&self, template: RecurringTransaction) -> Result<String, AppError> {
        self.update_templates(|templates| TemplateService::add(templates, template))
    }

    /// Applies `edit` to a stored template. Nothing is saved when the edited
    /// template fails validation.
    pub fn update_recurring<F>(
        &self,
        template_id: &str,
        edit: F,
    ) -> Result<RecurringTransaction, AppError>
    where
        F: FnOnce(&mut RecurringTransaction),
    {
        let updated =
            self.update_templates(|templates| TemplateService::update(templates, template_id, edit))?;
        info!(template = template_id, "recurring template edited");
        Ok(updated)
    }

    pub fn set_recurring_paused(&self, template_id: &str, paused: bool) -> Result<(), AppError> {
        self.update_templates(|templates| {
            TemplateService::set_paused(templates, template_id, paused)
        })?;
        info!(template = template_id, paused, "recurring template updated");
        Ok(())
    }

    pub fn delete_recurring(&self, template_id: &str) -> Result<RecurringTransaction, AppError> {
        self.update_templates(|templates| TemplateService::remove(templates, template_id))
    }

    pub fn goals(&self) -> Result<(Vec<SavingsVaultGoal>, VaultTotals), AppError> {
        let goals: Vec<SavingsVaultGoal> = load_collection(self.store.as_ref(), GOALS_KEY)?;
        let totals = VaultTotals::from_goals(&goals);
        Ok((goals, totals))
    }

    pub fn create_goal(
        &self,
        title: &str,
        target_amount: f64,
        deadline: Option<NaiveDate>,
    ) -> Result<SavingsVaultGoal, AppError> {
        let goal = VaultService::create_goal(title, target_amount, deadline, self.now())?;
        let (mut goals, _) = self.goals()?;
        goals.push(goal.clone());
        save_collection(self.store.as_ref(), GOALS_KEY, &goals)?;
        Ok(goal)
    }

    pub fn deposit(
        &self,
        goal_id: &str,
        amount: f64,
        note: Option<String>,
    ) -> Result<DepositOutcome, AppError> {
        let (goals, _) = self.goals()?;
        let (updated, outcome) =
            VaultService::deposit_into(&goals, goal_id, amount, note, self.now())?;
        save_collection(self.store.as_ref(), GOALS_KEY, &updated)?;
        Ok(outcome)
    }

    pub fn delete_goal(&self, goal_id: &str) -> Result<(), AppError> {
        let (goals, _) = self.goals()?;
        let remaining = VaultService::delete_goal(&goals, goal_id)?;
        save_collection(self.store.as_ref(), GOALS_KEY, &remaining)?;
        info!(goal = goal_id, "savings goal deleted");
        Ok(())
    }

    /// Category split, daily series and comparison with the prior month.
    pub fn insights(&self, month: Option<MonthWindow>) -> Result<MonthInsights, AppError> {
        let month = month.unwrap_or_else(|| self.current_month());
        let snapshot = self.snapshot()?;
        let today = self.today();
        let current = BalanceService::month_summary(
            &snapshot.incomes,
            &snapshot.expenses,
            &snapshot.recurring,
            &month,
            today,
        );
        let previous = BalanceService::month_summary(
            &snapshot.incomes,
            &snapshot.expenses,
            &snapshot.recurring,
            &month.previous(),
            today,
        );
        Ok(MonthInsights {
            month,
            categories: category_breakdown(&current.expenses),
            daily: daily_series(&month, &current.incomes, &current.expenses),
            comparison: month_comparison(&current, &previous),
        })
    }

    /// Alerts for the current month. Each kind is only produced when its
    /// notification switch is on.
    pub fn alerts(&self) -> Result<AlertReport, AppError> {
        let switches = &self.config.notifications;
        let snapshot = self.snapshot()?;
        let today = self.today();
        let mut report = AlertReport::default();

        if switches.budget_exceeded || switches.daily_budget {
            let summary = BalanceService::month_summary(
                &snapshot.incomes,
                &snapshot.expenses,
                &snapshot.recurring,
                &self.current_month(),
                today,
            );
            report.budget = budget_alert(
                summary.total_income,
                summary.total_expenses,
                self.config.budget_low_threshold_percent,
            )
            .filter(|alert| match alert {
                BudgetAlert::Exceeded { .. } => switches.budget_exceeded,
                BudgetAlert::Low { .. } => switches.daily_budget,
            });
        }

        if switches.savings_nudges {
            report.savings = snapshot
                .goals
                .iter()
                .filter_map(|goal| {
                    savings_nudge(goal, self.config.savings_nudge_threshold_percent).map(|nudge| {
                        GoalNudge {
                            goal_id: goal.id.clone(),
                            title: goal.title.clone(),
                            nudge,
                        }
                    })
                })
                .collect();
        }

        if switches.recurring_reminders {
            report.reminders = detach(recurring_reminders(
                &snapshot.recurring,
                today,
                self.config.upcoming_days_ahead,
            ));
        }

        Ok(report)
    }

    fn update_templates<T, F>(&self, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Vec<RecurringTransaction>) -> Result<T, fintrack_core::CoreError>,
    {
        let mut templates = self.templates()?;
        let result = apply(&mut templates)?;
        save_collection(self.store.as_ref(), RECURRING_KEY, &templates)?;
        Ok(result)
    }
}

fn detach(due: Vec<UpcomingDue<'_>>) -> Vec<UpcomingEntry> {
    due.into_iter()
        .map(|due| UpcomingEntry {
            template: due.template.clone(),
            next_date: due.next_date,
            days_until: due.days_until,
        })
        .collect()
}

fn ensure_amount(amount: f64) -> Result<(), DomainError> {
    if !amount.is_finite() {
        return Err(DomainError::NonFiniteAmount);
    }
    if amount < 0.0 {
        return Err(DomainError::NegativeAmount(amount));
    }
    Ok(())
}
