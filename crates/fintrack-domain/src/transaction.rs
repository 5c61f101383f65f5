//! Domain models for dated income and expense records.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, DomainError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("Income"),
            TransactionKind::Expense => f.write_str("Expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
/// Where an income comes from.
pub enum IncomeSource {
    MainJob,
    SideJob,
    #[default]
    Other,
}

impl IncomeSource {
    pub const ALL: [IncomeSource; 3] = [
        IncomeSource::MainJob,
        IncomeSource::SideJob,
        IncomeSource::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            IncomeSource::MainJob => "mainJob",
            IncomeSource::SideJob => "sideJob",
            IncomeSource::Other => "other",
        }
    }
}

impl fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for IncomeSource {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        IncomeSource::ALL
            .into_iter()
            .find(|source| source.key().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "income source",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
/// Fixed set of expense categories.
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Entertainment,
    Healthcare,
    Shopping,
    Utilities,
    Education,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Shopping,
        ExpenseCategory::Utilities,
        ExpenseCategory::Education,
        ExpenseCategory::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Healthcare => "healthcare",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Education => "education",
            ExpenseCategory::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExpenseCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "expense category",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub source: IncomeSource,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<String>,
}

impl Income {
    /// Creates a manually entered income with a fresh identifier.
    pub fn new(source: IncomeSource, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source,
            amount,
            date,
            description: None,
            is_recurring: false,
            recurring_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_id: Option<String>,
}

impl Expense {
    /// Creates a manually entered expense with a fresh identifier.
    pub fn new(
        name: impl Into<String>,
        category: ExpenseCategory,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            amount,
            date,
            description: None,
            is_recurring: false,
            recurring_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Identifiable for Income {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Income {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Dated for Income {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn income_serializes_with_camel_case_keys() {
        let mut income = Income::new(
            IncomeSource::SideJob,
            250.0,
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        );
        income.id = "abc".into();
        let json = serde_json::to_value(&income).unwrap();
        assert_eq!(json["source"], "sideJob");
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["isRecurring"], false);
        assert!(json.get("recurringId").is_none());
    }

    #[test]
    fn expense_accepts_records_without_recurring_flags() {
        let raw = r#"{"id":"e1","name":"Rent","category":"housing","amount":900,"date":"2024-01-01"}"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.category, ExpenseCategory::Housing);
        assert!(!expense.is_recurring);
        assert_eq!(expense.recurring_id, None);
    }

    #[test]
    fn category_and_source_parse_from_keys() {
        assert_eq!("Utilities".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Utilities);
        assert_eq!("mainjob".parse::<IncomeSource>().unwrap(), IncomeSource::MainJob);
        assert!("rent".parse::<ExpenseCategory>().is_err());
    }
}
