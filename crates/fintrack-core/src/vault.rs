//! Savings vault ledger: goal creation, deposits, and completion tracking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use fintrack_domain::{position_by_id, SavingsDeposit, SavingsVaultGoal};

use crate::CoreError;

/// Result of a single deposit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositOutcome {
    pub goal: SavingsVaultGoal,
    pub deposit: SavingsDeposit,
    /// Set only by the deposit that takes the goal from below its target to
    /// at or above it.
    pub completed_now: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VaultTotals {
    pub total_saved: f64,
    pub goal_count: usize,
    pub completed_count: usize,
}

impl VaultTotals {
    pub fn from_goals(goals: &[SavingsVaultGoal]) -> Self {
        Self {
            total_saved: goals.iter().map(|goal| goal.current_amount).sum(),
            goal_count: goals.len(),
            completed_count: goals.iter().filter(|goal| goal.is_completed).count(),
        }
    }
}

pub struct VaultService;

impl VaultService {
    pub fn create_goal(
        title: impl Into<String>,
        target_amount: f64,
        deadline: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<SavingsVaultGoal, CoreError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CoreError::Validation("goal title must not be empty".into()));
        }
        ensure_positive(target_amount, "target amount")?;
        Ok(SavingsVaultGoal {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            target_amount,
            current_amount: 0.0,
            deadline,
            created_at: now,
            deposits: Vec::new(),
            is_completed: false,
        })
    }

    /// Appends a deposit to a copy of `goal`.
    ///
    /// `is_completed` only ever flips from false to true; there is no
    /// operation that lowers `current_amount`.
    pub fn deposit(
        goal: &SavingsVaultGoal,
        amount: f64,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<DepositOutcome, CoreError> {
        ensure_positive(amount, "deposit amount")?;

        let deposit = SavingsDeposit {
            id: Uuid::new_v4().to_string(),
            amount,
            date: now,
            note: note.filter(|text| !text.trim().is_empty()),
        };

        let mut updated = goal.clone();
        updated.current_amount += amount;
        updated.deposits.push(deposit.clone());
        let reached = updated.current_amount >= updated.target_amount;
        let completed_now = goal.current_amount < goal.target_amount && reached;
        updated.is_completed = goal.is_completed || reached;

        if completed_now {
            info!(
                goal = %updated.id,
                title = %updated.title,
                saved = updated.current_amount,
                "savings goal completed"
            );
        }

        Ok(DepositOutcome {
            goal: updated,
            deposit,
            completed_now,
        })
    }

    /// Deposits into the goal with `goal_id`, returning the updated collection.
    pub fn deposit_into(
        goals: &[SavingsVaultGoal],
        goal_id: &str,
        amount: f64,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Vec<SavingsVaultGoal>, DepositOutcome), CoreError> {
        let position = position_by_id(goals, goal_id)
            .ok_or_else(|| CoreError::GoalNotFound(goal_id.to_string()))?;
        let outcome = Self::deposit(&goals[position], amount, note, now)?;
        let mut updated = goals.to_vec();
        updated[position] = outcome.goal.clone();
        Ok((updated, outcome))
    }

    /// Removes a goal together with its deposits. Other goals are untouched.
    pub fn delete_goal(
        goals: &[SavingsVaultGoal],
        goal_id: &str,
    ) -> Result<Vec<SavingsVaultGoal>, CoreError> {
        if position_by_id(goals, goal_id).is_none() {
            return Err(CoreError::GoalNotFound(goal_id.to_string()));
        }
        Ok(goals
            .iter()
            .filter(|goal| goal.id != goal_id)
            .cloned()
            .collect())
    }
}

fn ensure_positive(amount: f64, what: &str) -> Result<(), CoreError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{what} must be a positive number, got {amount}"
        )))
    }
}
