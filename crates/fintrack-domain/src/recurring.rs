//! Recurring transaction templates.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{common::*, DomainError, ExpenseCategory, IncomeSource, TransactionKind};

/// A repeating income or expense rule. Occurrences are derived from it at
/// read time and are never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: String,
    #[serde(flatten)]
    pub details: RecurringDetails,
    pub amount: f64,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "empty_date_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Kind-specific fields, tagged by `"type"` in stored records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecurringDetails {
    Income {
        #[serde(default)]
        source: IncomeSource,
    },
    Expense {
        #[serde(default)]
        name: String,
        #[serde(default)]
        category: ExpenseCategory,
    },
}

impl RecurringTransaction {
    pub fn new(
        details: RecurringDetails,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            details,
            amount,
            frequency,
            start_date,
            end_date: None,
            is_paused: false,
            description: None,
        }
    }

    pub fn income(
        source: IncomeSource,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(RecurringDetails::Income { source }, amount, frequency, start_date)
    }

    pub fn expense(
        name: impl Into<String>,
        category: ExpenseCategory,
        amount: f64,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(
            RecurringDetails::Expense {
                name: name.into(),
                category,
            },
            amount,
            frequency,
            start_date,
        )
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn paused(mut self) -> Self {
        self.is_paused = true;
        self
    }

    pub fn kind(&self) -> TransactionKind {
        match self.details {
            RecurringDetails::Income { .. } => TransactionKind::Income,
            RecurringDetails::Expense { .. } => TransactionKind::Expense,
        }
    }

    /// Human-facing label: the expense name, or the income source key.
    pub fn display_name(&self) -> String {
        match &self.details {
            RecurringDetails::Income { source } => source.to_string(),
            RecurringDetails::Expense { name, .. } => name.clone(),
        }
    }

    /// Checks the template invariants: finite non-negative amount and
    /// `start_date <= end_date`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.amount.is_finite() {
            return Err(DomainError::NonFiniteAmount);
        }
        if self.amount < 0.0 {
            return Err(DomainError::NegativeAmount(self.amount));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(DomainError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }

    /// False when the template's date range cannot overlap `month`.
    pub fn may_fire_in(&self, month: &MonthWindow) -> bool {
        if self.start_date > month.end {
            return false;
        }
        !matches!(self.end_date, Some(end) if end < month.start)
    }
}

impl Identifiable for RecurringTransaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for RecurringTransaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Stored templates may carry `"endDate": ""` when the field was left blank.
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
