//! Display formatting for the dashboard's Italian euro locale.

use chrono::{Locale, NaiveDate, NaiveTime, TimeZone, Utc};

/// Formats an amount in cents as euros, e.g. `1.234,56 €`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let units = group_thousands(cents / 100);
    format!("{}{},{:02} €", sign, units, cents % 100)
}

/// Formats a date as day, short month and year, e.g. `19 ott 2026`.
pub fn format_date_to_local(date: NaiveDate) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .format_localized("%-d %b %Y", Locale::it_IT)
        .to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0), "0,00 €");
        assert_eq!(format_currency(5), "0,05 €");
        assert_eq!(format_currency(150050), "1.500,50 €");
        assert_eq!(format_currency(123456789), "1.234.567,89 €");
        assert_eq!(format_currency(-99900), "-999,00 €");
    }

    #[test]
    fn test_format_date_to_local() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_date_to_local(date), "19 ott 2026");

        let date = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(format_date_to_local(date), "5 gen 2023");

        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(format_date_to_local(date), "30 giu 2024");
    }
}
