use chrono::{Datelike, NaiveDate};

use crate::dates::month_name;

/// Format a float with two decimals and thousands separators: 1,234.56
pub fn thousands(val: f64) -> String {
    let negative = val < 0.0;
    let fixed = format!("{:.2}", val.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// `1,234.56 horas`
pub fn hours(val: f64) -> String {
    format!("{} horas", thousands(val))
}

/// `1234.56 horas`
pub fn plain_hours(val: f64) -> String {
    format!("{val:.2} horas")
}

/// `2.5 días`
pub fn days(val: f64) -> String {
    format!("{val:.1} días")
}

/// `19 de octubre de 2026`
pub fn long_date(date: NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), month_name(date.month()), date.year())
}

/// `enero 2024`
pub fn month_year(date: NaiveDate) -> String {
    format!("{} {}", month_name(date.month()), date.year())
}

/// `15/01/2024`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_bytes(bytes: u64) -> String {
    let mut with_commas = String::new();
    for (i, c) in bytes.to_string().chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    format!("{} bytes", with_commas.chars().rev().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_formatting() {
        assert_eq!(thousands(1234.56), "1,234.56");
        assert_eq!(thousands(-500.0), "-500.00");
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(1000000.99), "1,000,000.99");
        assert_eq!(thousands(42.1), "42.10");
    }

    #[test]
    fn test_labels() {
        assert_eq!(hours(1234.5), "1,234.50 horas");
        assert_eq!(plain_hours(1234.5), "1234.50 horas");
        assert_eq!(days(2.26), "2.3 días");
        assert_eq!(days(3.0), "3.0 días");
    }

    #[test]
    fn test_spanish_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(long_date(date), "19 de octubre de 2026");
        assert_eq!(month_year(date), "octubre 2026");
        assert_eq!(short_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), "05/01/2024");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(7_654_321), "7,654,321 bytes");
    }
}
