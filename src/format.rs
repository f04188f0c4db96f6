//! Turkish (tr-TR) display formatting for dates and numbers.
//!
//! The CMS sends timestamps either as full RFC 3339 strings
//! (`2024-10-12T09:30:00.000Z`) or as bare dates (`2024-10-12`) depending on
//! the field type. Both are accepted; anything else is shown as-is.

use chrono::{DateTime, Datelike, NaiveDate};

const MONTHS_LONG: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

const MONTHS_SHORT: [&str; 12] = [
    "Oca", "Şub", "Mar", "Nis", "May", "Haz", "Tem", "Ağu", "Eyl", "Eki", "Kas", "Ara",
];

/// Parse a CMS date or timestamp to a calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// `12 Ekim 2024`
pub fn long_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS_LONG[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}

/// `12 Eki`
pub fn short_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format!("{} {}", date.day(), MONTHS_SHORT[date.month0() as usize]),
        None => raw.to_string(),
    }
}

/// Group an integer with `.` thousands separators: `12000` → `12.000`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format an amount the way tr-TR locale formatting does: grouped integer
/// part, `,` decimal separator, at most three fraction digits, trailing
/// zeros dropped.
pub fn amount(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let whole = rounded.trunc();
    let fraction = ((rounded - whole) * 1000.0).round() as u64;

    let mut out = String::new();
    if negative && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole as u64));
    if fraction > 0 {
        let digits = format!("{fraction:03}");
        out.push(',');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Percentages are printed without a trailing `.0` for whole numbers.
pub fn percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_date_from_timestamp() {
        assert_eq!(long_date("2024-10-12T09:30:00.000Z"), "12 Ekim 2024");
        assert_eq!(long_date("2025-02-01T00:00:00Z"), "1 Şubat 2025");
    }

    #[test]
    fn short_date_from_bare_date() {
        assert_eq!(short_date("2024-08-30"), "30 Ağu");
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(long_date("yakında"), "yakında");
        assert_eq!(short_date(""), "");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(12000), "12.000");
        assert_eq!(group_thousands(1234567), "1.234.567");
    }

    #[test]
    fn amounts() {
        assert_eq!(amount(250000.0), "250.000");
        assert_eq!(amount(1234.5), "1.234,5");
        assert_eq!(amount(0.125), "0,125");
        assert_eq!(amount(-1500.0), "-1.500");
    }

    #[test]
    fn percents() {
        assert_eq!(percent(75.0), "75");
        assert_eq!(percent(33.5), "33.5");
    }
}
