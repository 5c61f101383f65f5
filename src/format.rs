//! Amount and date rendering for terminal output.

use chrono::NaiveDate;

/// Display symbol for the currencies the tracker offers; other codes are
/// shown as-is.
pub fn symbol_for(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "RUB" => "₽".into(),
        "TJS" => "tjs".into(),
        other => format!("{} ", other),
    }
}

/// Formats `amount` with grouping and two decimals. With `show_sign` a `+`
/// is printed for non-negative values.
pub fn format_amount(amount: f64, currency: &str, show_sign: bool) -> String {
    let sign = if amount < 0.0 {
        "-"
    } else if show_sign {
        "+"
    } else {
        ""
    };
    let body = format!("{:.2}", amount.abs());
    let (int_part, fraction) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    format!(
        "{}{}{}.{}",
        sign,
        symbol_for(currency),
        group_digits(int_part, ','),
        fraction
    )
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_sign() {
        assert_eq!(format_amount(1234567.5, "USD", false), "$1,234,567.50");
        assert_eq!(format_amount(-42.0, "EUR", false), "-€42.00");
        assert_eq!(format_amount(0.0, "GBP", true), "+£0.00");
        assert_eq!(format_amount(999.999, "RUB", false), "₽1,000.00");
        assert_eq!(format_amount(5.0, "CHF", false), "CHF 5.00");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(33.333), "33.3%");
    }
}
