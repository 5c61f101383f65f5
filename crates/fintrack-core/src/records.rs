//! Removal of manually entered incomes and expenses.

use tracing::debug;

use fintrack_domain::{position_by_id, Expense, Identifiable, Income};

use crate::{expansion::is_occurrence_id, CoreError};

pub struct RecordService;

impl RecordService {
    pub fn remove_income(incomes: &mut Vec<Income>, id: &str) -> Result<Income, CoreError> {
        remove_stored(incomes, id, CoreError::IncomeNotFound)
    }

    pub fn remove_expense(expenses: &mut Vec<Expense>, id: &str) -> Result<Expense, CoreError> {
        remove_stored(expenses, id, CoreError::ExpenseNotFound)
    }
}

fn remove_stored<T: Identifiable>(
    records: &mut Vec<T>,
    id: &str,
    not_found: fn(String) -> CoreError,
) -> Result<T, CoreError> {
    if is_occurrence_id(id) {
        return Err(CoreError::RecurringOccurrence(id.to_string()));
    }
    let position = position_by_id(records, id).ok_or_else(|| not_found(id.to_string()))?;
    debug!(record = id, "removed stored record");
    Ok(records.remove(position))
}
