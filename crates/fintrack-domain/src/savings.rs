//! Savings vault goals and their deposits.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

/// An accumulation target fed by append-only deposits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsVaultGoal {
    pub id: String,
    pub title: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deposits: Vec<SavingsDeposit>,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsDeposit {
    pub id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SavingsVaultGoal {
    /// Share of the target reached so far, in percent. Not capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount * 100.0
    }

    /// Amount still missing to reach the target, never negative.
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn deposit_total(&self) -> f64 {
        total_amount(&self.deposits)
    }
}

impl Identifiable for SavingsVaultGoal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identifiable for SavingsDeposit {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for SavingsDeposit {
    fn amount(&self) -> f64 {
        self.amount
    }
}
