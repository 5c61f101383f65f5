//! Upcoming due dates for recurring templates, used for reminders.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use fintrack_domain::RecurringTransaction;

use crate::occurrence::Occurrences;

/// A template together with its next due date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingDue<'a> {
    pub template: &'a RecurringTransaction,
    pub next_date: NaiveDate,
    pub days_until: i64,
}

/// Next date strictly after `today` on which `template` fires, or its start
/// date when it has not started yet. `None` once the template has ended.
pub fn next_occurrence(template: &RecurringTransaction, today: NaiveDate) -> Option<NaiveDate> {
    if matches!(template.end_date, Some(end) if end < today) {
        return None;
    }

    let next = if template.start_date > today {
        template.start_date
    } else {
        Occurrences::new(template.start_date, template.frequency)
            .seek(today)
            .find(|date| *date > today)?
    };

    match template.end_date {
        Some(end) if next > end => None,
        _ => Some(next),
    }
}

/// Active templates whose next occurrence falls within `days_ahead` days of
/// `today`, in input order.
pub fn upcoming(
    templates: &[RecurringTransaction],
    today: NaiveDate,
    days_ahead: u32,
) -> Vec<UpcomingDue<'_>> {
    let horizon = today
        .checked_add_days(Days::new(u64::from(days_ahead)))
        .unwrap_or(NaiveDate::MAX);

    templates
        .iter()
        .filter(|template| !template.is_paused)
        .filter_map(|template| {
            let next_date = next_occurrence(template, today)?;
            if next_date > horizon {
                return None;
            }
            Some(UpcomingDue {
                template,
                next_date,
                days_until: (next_date - today).num_days(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_domain::{ExpenseCategory, Frequency, IncomeSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_from(start: NaiveDate) -> RecurringTransaction {
        RecurringTransaction::expense(
            "Groceries",
            ExpenseCategory::Food,
            60.0,
            Frequency::Weekly,
            start,
        )
    }

    #[test]
    fn weekly_template_due_in_three_days_respects_window() {
        let today = date(2024, 6, 12);
        let template = weekly_from(date(2024, 6, 1));

        let within = upcoming(std::slice::from_ref(&template), today, 7);
        assert_eq!(within.len(), 1);
        assert_eq!(within[0].next_date, date(2024, 6, 15));
        assert_eq!(within[0].days_until, 3);

        assert!(upcoming(std::slice::from_ref(&template), today, 2).is_empty());
    }

    #[test]
    fn future_start_date_is_the_next_occurrence() {
        let template = RecurringTransaction::income(
            IncomeSource::SideJob,
            200.0,
            Frequency::Monthly,
            date(2024, 7, 1),
        );
        assert_eq!(next_occurrence(&template, date(2024, 6, 28)), Some(date(2024, 7, 1)));
    }

    #[test]
    fn occurrence_on_today_moves_to_the_following_period() {
        let template = weekly_from(date(2024, 6, 1));
        assert_eq!(next_occurrence(&template, date(2024, 6, 8)), Some(date(2024, 6, 15)));
    }

    #[test]
    fn ended_templates_have_no_next_occurrence() {
        let ended = weekly_from(date(2024, 1, 1)).with_end_date(date(2024, 6, 1));
        assert_eq!(next_occurrence(&ended, date(2024, 6, 12)), None);

        let ends_before_next = weekly_from(date(2024, 6, 1)).with_end_date(date(2024, 6, 14));
        assert_eq!(next_occurrence(&ends_before_next, date(2024, 6, 12)), None);
    }

    #[test]
    fn paused_templates_are_excluded() {
        let template = weekly_from(date(2024, 6, 1)).paused();
        assert!(upcoming(&[template], date(2024, 6, 12), 30).is_empty());
    }
}
