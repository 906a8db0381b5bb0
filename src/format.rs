//! Display formatting for prices, quantities and dates.

use chrono::NaiveDate;

/// Format a value as US dollars with thousands separators, e.g. `$1,234.56`.
pub fn format_usd(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    format!("{sign}${}.{fraction}", group_thousands(whole))
}

/// Format a value rounded to an integer with thousands separators.
pub fn format_large_number(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let rounded = format!("{:.0}", value.abs());
    format!("{sign}{}", group_thousands(&rounded))
}

/// Format a market cap in billions, e.g. `$1.26B`.
pub fn format_market_cap(value: f64) -> String {
    format!("${:.2}B", value / 1e9)
}

/// Format a percentage, e.g. `12.35%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// Format an ISO `YYYY-MM-DD` date as `dd/mm/yyyy`; unparsable input is
/// returned unchanged.
pub fn format_date(iso: &str) -> String {
    // Accept full timestamps by looking at the date part only
    let date_part = iso.get(..10).unwrap_or(iso);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(display_date)
        .unwrap_or_else(|_| iso.to_string())
}

pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1234.567), "$1,234.57");
        assert_eq!(format_usd(64000.5), "$64,000.50");
        assert_eq!(format_usd(-1500.0), "-$1,500.00");
        assert_eq!(format_usd(999.999), "$1,000.00");
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(19_700_000.4), "19,700,000");
        assert_eq!(format_large_number(999.0), "999");
        assert_eq!(format_large_number(1000.0), "1,000");
    }

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(1_260_809_850_000.0), "$1260.81B");
        assert_eq!(format_market_cap(450_000_000.0), "$0.45B");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(12.346, 2), "12.35%");
        assert_eq!(format_percentage(5.0, 0), "5%");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05"), "05/01/2024");
        assert_eq!(format_date("2024-01-05T00:00:00"), "05/01/2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
