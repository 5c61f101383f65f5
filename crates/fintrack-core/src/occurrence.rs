//! Occurrence generation for recurring rules.

use chrono::{Datelike, NaiveDate};

use fintrack_domain::{Frequency, MonthWindow};

/// Iterator over the dates a rule fires on, beginning with the anchor itself.
///
/// Every date is computed from the anchor (`anchor + n periods`), never from
/// the previous occurrence, so month-end clamping does not accumulate.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDate,
    frequency: Frequency,
    step: u32,
    exhausted: bool,
}

impl Occurrences {
    pub fn new(anchor: NaiveDate, frequency: Frequency) -> Self {
        Self {
            anchor,
            frequency,
            step: 0,
            exhausted: false,
        }
    }

    /// Skips ahead to a step that is still on or before `target`, so that
    /// long-running rules do not have to be walked period by period.
    pub fn seek(mut self, target: NaiveDate) -> Self {
        if target <= self.anchor {
            return self;
        }
        let lower_bound = match self.frequency {
            Frequency::Weekly => (target - self.anchor).num_days().div_euclid(7),
            Frequency::Monthly => month_index(target) - month_index(self.anchor) - 1,
            Frequency::Yearly => i64::from(target.year() - self.anchor.year()) - 1,
        };
        let lower_bound = u32::try_from(lower_bound.max(0)).unwrap_or(u32::MAX);
        self.step = self.step.max(lower_bound);
        self
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.exhausted {
            return None;
        }
        let date = self.frequency.advance(self.anchor, self.step);
        match (date, self.step.checked_add(1)) {
            (Some(date), Some(next_step)) => {
                self.step = next_step;
                Some(date)
            }
            (date, _) => {
                self.exhausted = true;
                date
            }
        }
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Dates on which a rule starting at `start` fires inside `window`.
///
/// A date is emitted when it lies in `[window.start, window.end]`, is not
/// after `end` (inclusive bound) and is not after `cutoff`. The result is
/// sorted ascending and empty when the rule cannot overlap the window.
pub fn occurrences_in_month(
    start: NaiveDate,
    end: Option<NaiveDate>,
    frequency: Frequency,
    window: &MonthWindow,
    cutoff: Option<NaiveDate>,
) -> Vec<NaiveDate> {
    if start > window.end {
        return Vec::new();
    }
    if matches!(end, Some(end) if end < window.start) {
        return Vec::new();
    }

    let limit = [Some(window.end), end, cutoff]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(window.end);

    Occurrences::new(start, frequency)
        .seek(window.start)
        .skip_while(|date| *date < window.start)
        .take_while(|date| *date <= limit)
        .collect()
}
