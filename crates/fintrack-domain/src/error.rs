use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("amount must not be negative: {0}")]
    NegativeAmount(f64),
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidMonth(String),
    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}
