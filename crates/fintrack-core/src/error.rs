use thiserror::Error;

use fintrack_domain::DomainError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Savings goal not found: {0}")]
    GoalNotFound(String),
    #[error("Income not found: {0}")]
    IncomeNotFound(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Record {0} is a recurring occurrence; edit or delete its template instead")]
    RecurringOccurrence(String),
    #[error("Recurring template not found: {0}")]
    TemplateNotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
