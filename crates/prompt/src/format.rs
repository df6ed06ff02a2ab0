//! Readability formatting for monetary, date and list values.
//!
//! The CRM's audience works in Brazilian conventions, so currency is
//! rendered `R$ 1.234,56` and dates `dd/mm/yyyy`.

use chrono::{DateTime, Utc};

/// Format a monetary value as Brazilian currency.  `None` renders as
/// `R$ 0` so absence stays explicit in the prompt.
pub fn currency(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "R$ 0".into();
    };

    let negative = v < 0.0;
    let cents = (v.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!(
        "{}R$ {grouped},{frac:02}",
        if negative { "-" } else { "" }
    )
}

/// Localized `dd/mm/yyyy` rendering of a timestamp.
pub fn date(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_grouping_and_decimals() {
        assert_eq!(currency(Some(0.0)), "R$ 0,00");
        assert_eq!(currency(Some(7.5)), "R$ 7,50");
        assert_eq!(currency(Some(1234.56)), "R$ 1.234,56");
        assert_eq!(currency(Some(1_000_000.0)), "R$ 1.000.000,00");
        assert_eq!(currency(Some(-99.9)), "-R$ 99,90");
    }

    #[test]
    fn currency_none_is_explicit_zero() {
        assert_eq!(currency(None), "R$ 0");
    }

    #[test]
    fn date_is_day_first() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 5, 14, 30, 0).unwrap();
        assert_eq!(date(&ts), "05/08/2026");
    }
}
