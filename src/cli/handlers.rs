use chrono::NaiveDate;

use fintrack_core::{BudgetAlert, CoreError, SavingsNudge};
use fintrack_domain::{
    Expense, ExpenseCategory, Frequency, Income, IncomeSource, MonthWindow, RecurringDetails,
    RecurringTransaction,
};

use super::{output, LoopControl};
use crate::{
    format::{format_amount, format_date, format_percent},
    AppError, FinanceApp,
};

const COMMANDS: &[(&str, &str)] = &[
    ("summary [YYYY-MM]", "Month totals with the balance carried forward"),
    ("upcoming [days]", "Recurring items due soon"),
    ("add-income <amount> <source> [date] [description]", "Record an income"),
    (
        "add-expense <amount> <category> <name> [date] [description]",
        "Record an expense",
    ),
    (
        "add-recurring income <amount> <source> <frequency> <start> [end]",
        "Add a recurring income",
    ),
    (
        "add-recurring expense <amount> <category> <name> <frequency> <start> [end]",
        "Add a recurring expense",
    ),
    ("delete-income <id>", "Delete a recorded income"),
    ("delete-expense <id>", "Delete a recorded expense"),
    ("recurring", "List recurring templates"),
    (
        "edit-recurring <id> <field=value>...",
        "Edit amount, frequency, start, end, name, category, source or description",
    ),
    ("pause <id>", "Pause a recurring template"),
    ("resume <id>", "Resume a paused template"),
    ("delete-recurring <id>", "Delete a recurring template"),
    ("goals", "List savings goals"),
    ("add-goal <title> <target> [deadline]", "Create a savings goal"),
    ("deposit <goal-id> <amount> [note]", "Deposit into a savings goal"),
    ("delete-goal <goal-id>", "Delete a savings goal and its deposits"),
    ("insights [YYYY-MM]", "Category breakdown and month comparison"),
    ("alerts", "Budget, savings and recurring notifications"),
    ("help", "Show this help"),
    ("exit", "Stop reading commands"),
];

pub fn usage() -> String {
    let width = COMMANDS.iter().map(|(syntax, _)| syntax.len()).max().unwrap_or(0);
    let mut text = String::from("Usage: fintrack_cli <command> [args]\nCommands:\n");
    for (syntax, summary) in COMMANDS {
        text.push_str(&format!("  {:width$}  {}\n", syntax, summary, width = width));
    }
    text.push_str("Dates use YYYY-MM-DD. Frequencies: weekly, monthly, yearly.");
    text
}

/// Runs a single tokenized command.
pub fn dispatch(app: &FinanceApp, command: &str, args: &[&str]) -> Result<LoopControl, AppError> {
    match command.to_ascii_lowercase().as_str() {
        "summary" => summary(app, args)?,
        "upcoming" => upcoming(app, args)?,
        "add-income" => add_income(app, args)?,
        "add-expense" => add_expense(app, args)?,
        "add-recurring" => add_recurring(app, args)?,
        "delete-income" => {
            let removed = app.delete_income(arg(args, 0, "income id")?)?;
            output::success(format!(
                "Deleted income {} of {}",
                removed.id,
                format_amount(removed.amount, &app.config().currency, false)
            ));
        }
        "delete-expense" => {
            let removed = app.delete_expense(arg(args, 0, "expense id")?)?;
            output::success(format!(
                "Deleted expense {} of {}",
                removed.name,
                format_amount(removed.amount, &app.config().currency, false)
            ));
        }
        "recurring" => list_recurring(app)?,
        "edit-recurring" => edit_recurring(app, args)?,
        "pause" => set_paused(app, args, true)?,
        "resume" => set_paused(app, args, false)?,
        "delete-recurring" => {
            let removed = app.delete_recurring(arg(args, 0, "template id")?)?;
            output::success(format!("Deleted recurring {}", removed.display_name()));
        }
        "goals" => list_goals(app)?,
        "add-goal" => add_goal(app, args)?,
        "deposit" => deposit(app, args)?,
        "delete-goal" => {
            let goal_id = arg(args, 0, "goal id")?;
            app.delete_goal(goal_id)?;
            output::success(format!("Deleted savings goal {}", goal_id));
        }
        "insights" => insights(app, args)?,
        "alerts" => alerts(app)?,
        "help" => output::info(usage()),
        "exit" | "quit" => return Ok(LoopControl::Exit),
        other => {
            return Err(AppError::InvalidInput(format!(
                "unknown command `{}`; run `help` for a list",
                other
            )))
        }
    }
    Ok(LoopControl::Continue)
}

fn summary(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let currency = app.config().currency.clone();
    let sheet = app.month_sheet(optional_month(args, 0)?)?;
    let summary = &sheet.summary;

    output::section(format!("Summary for {}", summary.month));
    output::info(format!(
        "Previous balance: {}",
        format_amount(sheet.previous_balance, &currency, false)
    ));
    output::info(format!(
        "Income:           {}",
        format_amount(summary.total_income, &currency, false)
    ));
    output::info(format!(
        "Expenses:         {}",
        format_amount(summary.total_expenses, &currency, false)
    ));
    output::info(format!(
        "Month balance:    {}",
        output::signed(
            summary.balance,
            format_amount(summary.balance, &currency, true)
        )
    ));
    output::info(format!(
        "Total balance:    {}",
        output::signed(
            sheet.total_balance,
            format_amount(sheet.total_balance, &currency, false)
        )
    ));

    for income in &summary.incomes {
        output::info(format!(
            "  {}  + {:<24} {}{}",
            format_date(income.date),
            income.source.to_string(),
            format_amount(income.amount, &currency, false),
            recurring_marker(income.is_recurring)
        ));
    }
    for expense in &summary.expenses {
        output::info(format!(
            "  {}  - {:<24} {}{}",
            format_date(expense.date),
            format!("{} ({})", expense.name, expense.category),
            format_amount(expense.amount, &currency, false),
            recurring_marker(expense.is_recurring)
        ));
    }
    Ok(())
}

fn upcoming(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let days = match args.first() {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
            AppError::InvalidInput(format!("`{}` is not a number of days", raw))
        })?),
        None => None,
    };
    let window = days.unwrap_or(app.config().upcoming_days_ahead);
    let entries = app.upcoming(days)?;
    let currency = &app.config().currency;

    output::section(format!("Due in the next {} days", window));
    if entries.is_empty() {
        output::info("Nothing due.");
        return Ok(());
    }
    for entry in entries {
        output::info(format!(
            "  {}  {:<10} {:<24} {}  [{}]",
            format_date(entry.next_date),
            days_label(entry.days_until),
            entry.template.display_name(),
            format_amount(entry.template.amount, currency, false),
            entry.template.id
        ));
    }
    Ok(())
}

fn add_income(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let amount = parse_amount(arg(args, 0, "amount")?)?;
    let source: IncomeSource = arg(args, 1, "source")?.parse()?;
    let date = optional_date(args, 2)?.unwrap_or_else(|| app.today());
    let mut income = Income::new(source, amount, date);
    if let Some(description) = rest_text(args, 3) {
        income = income.with_description(description);
    }
    let income = app.add_income(income)?;
    output::success(format!(
        "Income recorded: {} on {} [{}]",
        format_amount(income.amount, &app.config().currency, false),
        format_date(income.date),
        income.id
    ));
    Ok(())
}

fn add_expense(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let amount = parse_amount(arg(args, 0, "amount")?)?;
    let category: ExpenseCategory = arg(args, 1, "category")?.parse()?;
    let name = arg(args, 2, "name")?;
    let date = optional_date(args, 3)?.unwrap_or_else(|| app.today());
    let mut expense = Expense::new(name, category, amount, date);
    if let Some(description) = rest_text(args, 4) {
        expense = expense.with_description(description);
    }
    let expense = app.add_expense(expense)?;
    output::success(format!(
        "Expense recorded: {} {} on {} [{}]",
        expense.name,
        format_amount(expense.amount, &app.config().currency, false),
        format_date(expense.date),
        expense.id
    ));
    Ok(())
}

fn add_recurring(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let kind = arg(args, 0, "income|expense")?.to_ascii_lowercase();
    let template = match kind.as_str() {
        "income" => {
            let amount = parse_amount(arg(args, 1, "amount")?)?;
            let source: IncomeSource = arg(args, 2, "source")?.parse()?;
            let frequency: Frequency = arg(args, 3, "frequency")?.parse()?;
            let start = parse_date(arg(args, 4, "start date")?)?;
            with_optional_end(
                RecurringTransaction::income(source, amount, frequency, start),
                optional_date(args, 5)?,
            )
        }
        "expense" => {
            let amount = parse_amount(arg(args, 1, "amount")?)?;
            let category: ExpenseCategory = arg(args, 2, "category")?.parse()?;
            let name = arg(args, 3, "name")?;
            let frequency: Frequency = arg(args, 4, "frequency")?.parse()?;
            let start = parse_date(arg(args, 5, "start date")?)?;
            with_optional_end(
                RecurringTransaction::expense(name, category, amount, frequency, start),
                optional_date(args, 6)?,
            )
        }
        other => {
            return Err(AppError::InvalidInput(format!(
                "expected `income` or `expense`, got `{}`",
                other
            )))
        }
    };
    let name = template.display_name();
    let id = app.add_recurring(template)?;
    output::success(format!("Recurring {} added [{}]", name, id));
    Ok(())
}

/// One `field=value` change requested by `edit-recurring`.
#[derive(Debug, Clone, PartialEq)]
enum TemplateEdit {
    Amount(f64),
    Frequency(Frequency),
    Start(NaiveDate),
    End(Option<NaiveDate>),
    Name(String),
    Category(ExpenseCategory),
    Source(IncomeSource),
    Description(Option<String>),
}

impl TemplateEdit {
    fn parse(raw: &str) -> Result<Self, AppError> {
        let (field, value) = raw.split_once('=').ok_or_else(|| {
            AppError::InvalidInput(format!("expected <field>=<value>, got `{}`", raw))
        })?;
        let value = value.trim();
        let edit = match field.trim().to_ascii_lowercase().as_str() {
            "amount" => TemplateEdit::Amount(parse_amount(value)?),
            "frequency" => TemplateEdit::Frequency(value.parse()?),
            "start" => TemplateEdit::Start(parse_date(value)?),
            "end" if value.is_empty() => TemplateEdit::End(None),
            "end" => TemplateEdit::End(Some(parse_date(value)?)),
            "name" => TemplateEdit::Name(value.to_string()),
            "category" => TemplateEdit::Category(value.parse()?),
            "source" => TemplateEdit::Source(value.parse()?),
            "description" => {
                TemplateEdit::Description((!value.is_empty()).then(|| value.to_string()))
            }
            other => {
                return Err(AppError::InvalidInput(format!(
                    "unknown template field `{}`",
                    other
                )))
            }
        };
        Ok(edit)
    }

    fn apply(self, template: &mut RecurringTransaction) -> Result<(), AppError> {
        let kind = template.kind();
        match (self, &mut template.details) {
            (TemplateEdit::Amount(amount), _) => template.amount = amount,
            (TemplateEdit::Frequency(frequency), _) => template.frequency = frequency,
            (TemplateEdit::Start(start), _) => template.start_date = start,
            (TemplateEdit::End(end), _) => template.end_date = end,
            (TemplateEdit::Description(text), _) => template.description = text,
            (TemplateEdit::Name(value), RecurringDetails::Expense { name, .. }) => *name = value,
            (TemplateEdit::Category(value), RecurringDetails::Expense { category, .. }) => {
                *category = value
            }
            (TemplateEdit::Source(value), RecurringDetails::Income { source }) => *source = value,
            (edit, _) => {
                return Err(AppError::InvalidInput(format!(
                    "{:?} does not apply to a recurring {}",
                    edit, kind
                )))
            }
        }
        Ok(())
    }
}

fn edit_recurring(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let template_id = arg(args, 0, "template id")?;
    let edits = args[1..]
        .iter()
        .map(|raw| TemplateEdit::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    if edits.is_empty() {
        return Err(AppError::InvalidInput(
            "nothing to change; pass one or more <field>=<value>".into(),
        ));
    }

    let current = app
        .templates()?
        .into_iter()
        .find(|template| template.id == template_id)
        .ok_or_else(|| CoreError::TemplateNotFound(template_id.to_string()))?;
    let mut edited = current;
    for edit in edits {
        edit.apply(&mut edited)?;
    }

    let updated = app.update_recurring(template_id, move |template| *template = edited)?;
    output::success(format!(
        "Updated recurring {}: {} {} from {}",
        updated.display_name(),
        format_amount(updated.amount, &app.config().currency, false),
        updated.frequency,
        format_date(updated.start_date)
    ));
    Ok(())
}

fn list_recurring(app: &FinanceApp) -> Result<(), AppError> {
    let rows = app.template_rows()?;
    let currency = &app.config().currency;
    output::section("Recurring templates");
    if rows.is_empty() {
        output::info("No recurring templates.");
        return Ok(());
    }
    for row in rows {
        let template = &row.template;
        let status = match (template.is_paused, row.next_date) {
            (true, _) => "paused".to_string(),
            (false, Some(next)) => format!("next {}", format_date(next)),
            (false, None) => "ended".to_string(),
        };
        output::info(format!(
            "  {:<8} {:<24} {} {}  {}  [{}]",
            template.kind().to_string(),
            template.display_name(),
            format_amount(template.amount, currency, false),
            template.frequency,
            status,
            template.id
        ));
    }
    Ok(())
}

fn set_paused(app: &FinanceApp, args: &[&str], paused: bool) -> Result<(), AppError> {
    let template_id = arg(args, 0, "template id")?;
    app.set_recurring_paused(template_id, paused)?;
    let verb = if paused { "Paused" } else { "Resumed" };
    output::success(format!("{} recurring template {}", verb, template_id));
    Ok(())
}

fn list_goals(app: &FinanceApp) -> Result<(), AppError> {
    let (goals, totals) = app.goals()?;
    let currency = &app.config().currency;
    output::section("Savings vault");
    for goal in &goals {
        let deadline = goal
            .deadline
            .map(|date| format!("  due {}", format_date(date)))
            .unwrap_or_default();
        output::info(format!(
            "  {:<24} {} / {}  {}{}{}  [{}]",
            goal.title,
            format_amount(goal.current_amount, currency, false),
            format_amount(goal.target_amount, currency, false),
            format_percent(goal.progress_percent()),
            if goal.is_completed { "  completed" } else { "" },
            deadline,
            goal.id
        ));
    }
    output::info(format!(
        "Total saved: {} across {} goal(s), {} completed",
        format_amount(totals.total_saved, currency, false),
        totals.goal_count,
        totals.completed_count
    ));
    Ok(())
}

fn add_goal(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let title = arg(args, 0, "title")?;
    let target = parse_amount(arg(args, 1, "target")?)?;
    let deadline = optional_date(args, 2)?;
    let goal = app.create_goal(title, target, deadline)?;
    output::success(format!("Savings goal {} created [{}]", goal.title, goal.id));
    Ok(())
}

fn deposit(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let goal_id = arg(args, 0, "goal id")?;
    let amount = parse_amount(arg(args, 1, "amount")?)?;
    let outcome = app.deposit(goal_id, amount, rest_text(args, 2))?;
    let currency = &app.config().currency;
    output::success(format!(
        "Deposited {} into {}: {} / {}",
        format_amount(amount, currency, false),
        outcome.goal.title,
        format_amount(outcome.goal.current_amount, currency, false),
        format_amount(outcome.goal.target_amount, currency, false)
    ));
    if outcome.completed_now {
        output::success(format!("Goal reached: {}", outcome.goal.title));
    }
    Ok(())
}

fn insights(app: &FinanceApp, args: &[&str]) -> Result<(), AppError> {
    let insights = app.insights(optional_month(args, 0)?)?;
    let currency = &app.config().currency;

    output::section(format!("Insights for {}", insights.month));
    let total: f64 = insights.categories.values().sum();
    if insights.categories.is_empty() {
        output::info("No expenses this month.");
    }
    for (category, amount) in &insights.categories {
        output::info(format!(
            "  {:<14} {}  {}",
            category.to_string(),
            format_amount(*amount, currency, false),
            format_percent(amount / total * 100.0)
        ));
    }

    let comparison = insights.comparison;
    output::info(format!(
        "Income vs previous month:   {}{}",
        format_amount(comparison.income_delta, currency, true),
        change_suffix(comparison.income_change_percent)
    ));
    output::info(format!(
        "Expenses vs previous month: {}{}",
        format_amount(comparison.expense_delta, currency, true),
        change_suffix(comparison.expense_change_percent)
    ));

    let busiest = insights
        .daily
        .iter()
        .filter(|day| day.expenses > 0.0)
        .max_by(|a, b| a.expenses.total_cmp(&b.expenses));
    if let Some(day) = busiest {
        output::info(format!(
            "Highest spending day: {} ({})",
            format_date(day.date),
            format_amount(day.expenses, currency, false)
        ));
    }
    Ok(())
}

fn alerts(app: &FinanceApp) -> Result<(), AppError> {
    let report = app.alerts()?;
    let currency = &app.config().currency;
    output::section("Alerts");
    if report.is_empty() {
        output::info("All clear.");
        return Ok(());
    }
    match report.budget {
        Some(BudgetAlert::Exceeded { overspent }) => output::warning(format!(
            "Budget exceeded by {}",
            format_amount(overspent, currency, false)
        )),
        Some(BudgetAlert::Low { remaining }) => output::warning(format!(
            "Budget running low: {} left this month",
            format_amount(remaining, currency, false)
        )),
        None => {}
    }
    for entry in &report.savings {
        match entry.nudge {
            SavingsNudge::AlmostThere { remaining } => output::info(format!(
                "{} is almost funded: {} to go",
                entry.title,
                format_amount(remaining, currency, false)
            )),
            SavingsNudge::Achieved { saved } => output::success(format!(
                "{} reached its target with {} saved",
                entry.title,
                format_amount(saved, currency, false)
            )),
        }
    }
    for reminder in &report.reminders {
        output::info(format!(
            "{} due {} ({})",
            reminder.template.display_name(),
            days_label(reminder.days_until),
            format_date(reminder.next_date)
        ));
    }
    Ok(())
}

fn arg<'a>(args: &[&'a str], index: usize, name: &str) -> Result<&'a str, AppError> {
    args.get(index)
        .copied()
        .ok_or_else(|| AppError::InvalidInput(format!("missing argument <{}>", name)))
}

/// Joins the remaining arguments into free text, if any.
fn rest_text(args: &[&str], from: usize) -> Option<String> {
    let text = args.get(from..)?.join(" ");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_amount(raw: &str) -> Result<f64, AppError> {
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| AppError::InvalidInput(format!("`{}` is not a valid amount", raw)))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("`{}` is not a YYYY-MM-DD date", raw)))
}

fn optional_date(args: &[&str], index: usize) -> Result<Option<NaiveDate>, AppError> {
    args.get(index).map(|raw| parse_date(raw)).transpose()
}

fn optional_month(args: &[&str], index: usize) -> Result<Option<MonthWindow>, AppError> {
    Ok(args
        .get(index)
        .map(|raw| raw.parse::<MonthWindow>())
        .transpose()?)
}

fn with_optional_end(template: RecurringTransaction, end: Option<NaiveDate>) -> RecurringTransaction {
    match end {
        Some(end) => template.with_end_date(end),
        None => template,
    }
}

fn recurring_marker(is_recurring: bool) -> &'static str {
    if is_recurring {
        "  (recurring)"
    } else {
        ""
    }
}

fn days_label(days: i64) -> String {
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n => format!("in {} days", n),
    }
}

fn change_suffix(percent: Option<f64>) -> String {
    percent
        .map(|value| format!(" ({:+.1}%)", value))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_joins_trailing_arguments() {
        assert_eq!(
            rest_text(&["5", "note", "for", "june"], 1).as_deref(),
            Some("note for june")
        );
        assert_eq!(rest_text(&["5"], 1), None);
        assert_eq!(rest_text(&["5"], 3), None);
    }

    #[test]
    fn rejects_malformed_numbers_and_dates() {
        assert!(parse_amount("12.5").is_ok());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("twelve").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(optional_month(&["2024-13"], 0).is_err());
        assert_eq!(optional_month(&[], 0).unwrap(), None);
    }

    fn gym() -> RecurringTransaction {
        RecurringTransaction::expense(
            "Gym",
            ExpenseCategory::Healthcare,
            30.0,
            Frequency::Monthly,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
    }

    #[test]
    fn template_edits_parse_field_value_pairs() {
        assert_eq!(TemplateEdit::parse("amount=45").unwrap(), TemplateEdit::Amount(45.0));
        assert_eq!(
            TemplateEdit::parse("frequency=weekly").unwrap(),
            TemplateEdit::Frequency(Frequency::Weekly)
        );
        assert_eq!(TemplateEdit::parse("end=").unwrap(), TemplateEdit::End(None));
        assert!(TemplateEdit::parse("amount").is_err());
        assert!(TemplateEdit::parse("colour=red").is_err());
        assert!(TemplateEdit::parse("start=2024-02-30").is_err());
    }

    #[test]
    fn template_edits_respect_the_template_kind() {
        let mut template = gym();
        TemplateEdit::Name("Pool".into()).apply(&mut template).unwrap();
        TemplateEdit::Amount(25.0).apply(&mut template).unwrap();
        assert_eq!(template.display_name(), "Pool");
        assert_eq!(template.amount, 25.0);
        assert!(TemplateEdit::Source(IncomeSource::SideJob)
            .apply(&mut template)
            .is_err());
    }

    #[test]
    fn usage_lists_every_command() {
        let text = usage();
        for name in [
            "summary",
            "upcoming",
            "deposit",
            "delete-goal",
            "insights",
            "delete-income",
            "delete-expense",
            "edit-recurring",
        ] {
            assert!(text.contains(name), "usage is missing {name}");
        }
    }
}
