//! Materializes recurring templates into concrete transactions for a month.
//!
//! Expanded records are read-time views. They carry a synthetic id derived
//! from the template id and occurrence date, so expanding the same month twice
//! yields identical records and downstream merges can dedupe by id.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use fintrack_domain::{
    total_amount, Expense, Income, MonthWindow, RecurringDetails, RecurringTransaction,
};

use crate::occurrence::occurrences_in_month;

/// Recurring incomes and expenses generated for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpandedMonth {
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
}

impl ExpandedMonth {
    pub fn income_total(&self) -> f64 {
        total_amount(&self.incomes)
    }

    pub fn expense_total(&self) -> f64 {
        total_amount(&self.expenses)
    }

    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty() && self.expenses.is_empty()
    }
}

pub const OCCURRENCE_ID_PREFIX: &str = "recurring-";

/// Synthetic id of the occurrence of `template_id` on `date`.
pub fn occurrence_id(template_id: &str, date: NaiveDate) -> String {
    format!("{}{}-{}", OCCURRENCE_ID_PREFIX, template_id, date.format("%Y-%m-%d"))
}

/// True for ids minted by [`occurrence_id`]. Such records exist only in
/// expanded views and are never stored.
pub fn is_occurrence_id(id: &str) -> bool {
    id.starts_with(OCCURRENCE_ID_PREFIX)
}

/// Expands every active template for `month`.
///
/// With `limit_to_today` set and `month` being the month that contains
/// `today`, occurrences after `today` are left out because they have not
/// happened yet. Past months always materialize in full.
pub fn expand(
    templates: &[RecurringTransaction],
    month: &MonthWindow,
    today: NaiveDate,
    limit_to_today: bool,
) -> ExpandedMonth {
    let cutoff = (limit_to_today && month.contains(today)).then_some(today);
    expand_with_cutoff(templates, month, cutoff)
}

/// Expands every active template for `month`, dropping dates after `cutoff`.
pub fn expand_with_cutoff(
    templates: &[RecurringTransaction],
    month: &MonthWindow,
    cutoff: Option<NaiveDate>,
) -> ExpandedMonth {
    let mut expanded = ExpandedMonth::default();

    for template in templates.iter().filter(|t| !t.is_paused) {
        if !template.may_fire_in(month) {
            continue;
        }
        if let Err(err) = template.validate() {
            warn!(template = %template.id, error = %err, "skipping invalid recurring template");
            continue;
        }

        let dates = occurrences_in_month(
            template.start_date,
            template.end_date,
            template.frequency,
            month,
            cutoff,
        );
        for date in dates {
            materialize(template, date, &mut expanded);
        }
    }

    debug!(
        month = %month,
        incomes = expanded.incomes.len(),
        expenses = expanded.expenses.len(),
        "expanded recurring templates"
    );
    expanded
}

fn materialize(template: &RecurringTransaction, date: NaiveDate, into: &mut ExpandedMonth) {
    let id = occurrence_id(&template.id, date);
    match &template.details {
        RecurringDetails::Income { source } => into.incomes.push(Income {
            id,
            source: *source,
            amount: template.amount,
            date,
            description: template.description.clone(),
            is_recurring: true,
            recurring_id: Some(template.id.clone()),
        }),
        RecurringDetails::Expense { name, category } => into.expenses.push(Expense {
            id,
            name: name.clone(),
            category: *category,
            amount: template.amount,
            date,
            description: template.description.clone(),
            is_recurring: true,
            recurring_id: Some(template.id.clone()),
        }),
    }
}
