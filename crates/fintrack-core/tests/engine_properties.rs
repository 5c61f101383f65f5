use chrono::{NaiveDate, TimeZone, Utc};
use fintrack_core::{
    expand, occurrences_in_month, upcoming, BalanceService, TemplateService, VaultService,
};
use fintrack_domain::{
    Expense, ExpenseCategory, Frequency, Income, IncomeSource, MonthWindow, RecurringTransaction,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> MonthWindow {
    MonthWindow::from_ym(y, m).unwrap()
}

fn household() -> (Vec<Income>, Vec<Expense>, Vec<RecurringTransaction>) {
    let incomes = vec![
        Income::new(IncomeSource::SideJob, 250.0, date(2023, 11, 12)),
        Income::new(IncomeSource::Other, 80.0, date(2024, 3, 3)),
    ];
    let expenses = vec![
        Expense::new("Groceries", ExpenseCategory::Food, 140.0, date(2024, 1, 9)),
        Expense::new("Cinema", ExpenseCategory::Entertainment, 25.0, date(2024, 4, 27)),
        Expense::new("Shoes", ExpenseCategory::Shopping, 95.0, date(2024, 6, 2)),
    ];
    let templates = vec![
        RecurringTransaction::income(
            IncomeSource::MainJob,
            2500.0,
            Frequency::Monthly,
            date(2024, 1, 31),
        ),
        RecurringTransaction::expense(
            "Gym",
            ExpenseCategory::Healthcare,
            12.5,
            Frequency::Weekly,
            date(2024, 1, 3),
        ),
        RecurringTransaction::expense(
            "Insurance",
            ExpenseCategory::Utilities,
            300.0,
            Frequency::Yearly,
            date(2022, 2, 28),
        ),
        RecurringTransaction::expense(
            "Streaming",
            ExpenseCategory::Entertainment,
            9.99,
            Frequency::Monthly,
            date(2023, 9, 15),
        )
        .with_end_date(date(2024, 3, 15)),
    ];
    (incomes, expenses, templates)
}

#[test]
fn expansion_is_idempotent() {
    let (_, _, templates) = household();
    let today = date(2024, 6, 15);
    for window in [month(2024, 2), month(2024, 6)] {
        let first = expand(&templates, &window, today, true);
        let second = expand(&templates, &window, today, true);
        assert_eq!(first, second);
    }
}

#[test]
fn weekly_occurrences_stay_inside_february() {
    let february = month(2024, 2);
    let dates = occurrences_in_month(date(2024, 1, 1), None, Frequency::Weekly, &february, None);
    assert_eq!(
        dates,
        vec![date(2024, 2, 5), date(2024, 2, 12), date(2024, 2, 19), date(2024, 2, 26)]
    );
    assert!(dates
        .iter()
        .all(|d| february.start <= *d && *d <= february.end));
}

#[test]
fn cutoff_hides_occurrences_that_have_not_happened_yet() {
    let today = date(2024, 6, 15);
    let template = RecurringTransaction::income(
        IncomeSource::MainJob,
        1000.0,
        Frequency::Monthly,
        date(2024, 1, 20),
    );
    let june = MonthWindow::containing(today);
    let templates = [template];

    let limited = expand(&templates, &june, today, true);
    assert!(limited.incomes.iter().all(|i| i.date != date(2024, 6, 20)));

    let full = expand(&templates, &june, today, false);
    assert_eq!(full.incomes.len(), 1);
    assert_eq!(full.incomes[0].date, date(2024, 6, 20));
}

#[test]
fn ended_templates_produce_nothing() {
    let template = RecurringTransaction::expense(
        "Magazine",
        ExpenseCategory::Education,
        40.0,
        Frequency::Yearly,
        date(2020, 1, 1),
    )
    .with_end_date(date(2023, 1, 1));
    let expanded = expand(&[template], &month(2024, 1), date(2024, 6, 15), false);
    assert!(expanded.is_empty());
}

#[test]
fn balance_decomposes_and_carries_forward() {
    let (incomes, expenses, templates) = household();
    let today = date(2024, 6, 15);

    let mut window = month(2023, 10);
    while window.start <= today {
        let sheet = BalanceService::balance_sheet(&incomes, &expenses, &templates, &window, today);
        assert_eq!(
            sheet.total_balance,
            sheet.previous_balance + sheet.summary.balance
        );

        // Carry-forward only lines up for fully elapsed months.
        if window.end < today {
            let next_previous =
                BalanceService::previous_balance(&incomes, &expenses, &templates, &window.next());
            assert!(
                (next_previous - sheet.total_balance).abs() < 1e-6,
                "carry-forward mismatch after {window}: {next_previous} vs {}",
                sheet.total_balance
            );
        }
        window = window.next();
    }
}

#[test]
fn future_months_are_empty() {
    let (incomes, mut expenses, templates) = household();
    expenses.push(Expense::new(
        "Prepaid",
        ExpenseCategory::Other,
        50.0,
        date(2024, 7, 4),
    ));
    let today = date(2024, 6, 15);
    let july = MonthWindow::containing(today).next();

    let summary = BalanceService::month_summary(&incomes, &expenses, &templates, &july, today);
    assert_eq!(summary.total_income, 0.0);
    assert_eq!(summary.total_expenses, 0.0);
    assert_eq!(summary.balance, 0.0);
    assert!(summary.incomes.is_empty() && summary.expenses.is_empty());
}

#[test]
fn upcoming_respects_the_window() {
    let today = date(2024, 6, 15);
    let template = RecurringTransaction::expense(
        "Cleaner",
        ExpenseCategory::Housing,
        60.0,
        Frequency::Weekly,
        date(2024, 6, 4),
    );
    let templates = [template];

    let due = upcoming(&templates, today, 7);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].next_date, date(2024, 6, 18));
    assert_eq!(due[0].days_until, 3);

    assert!(upcoming(&templates, today, 2).is_empty());
}

#[test]
fn savings_goal_completion_latches() {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let goal = VaultService::create_goal("Holiday", 1000.0, None, now).unwrap();

    let after_first = VaultService::deposit(&goal, 600.0, None, now).unwrap();
    assert!(!after_first.goal.is_completed);

    let after_second = VaultService::deposit(&after_first.goal, 500.0, None, now).unwrap();
    assert!(after_second.goal.is_completed);
    assert!(after_second.completed_now);
    assert_eq!(after_second.goal.current_amount, 1100.0);
}

#[test]
fn paused_templates_are_ignored_everywhere() {
    let today = date(2024, 6, 15);
    let mut templates = vec![RecurringTransaction::expense(
        "Parking",
        ExpenseCategory::Transport,
        15.0,
        Frequency::Weekly,
        date(2024, 1, 1),
    )];
    let id = templates[0].id.clone();
    TemplateService::set_paused(&mut templates, &id, true).unwrap();

    for window in [month(2024, 5), month(2024, 6)] {
        assert!(expand(&templates, &window, today, false).is_empty());
    }
    assert!(upcoming(&templates, today, 30).is_empty());

    TemplateService::set_paused(&mut templates, &id, false).unwrap();
    assert_eq!(upcoming(&templates, today, 7).len(), 1);
}
