use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;

use crate::models::CellValue;

/// Hours credited to a row whose shift cannot be measured.
pub const DEFAULT_SHIFT_HOURS: f64 = 8.0;

const SECONDS_PER_DAY: i64 = 86_400;
/// First serial past 9999-12-31, the last day Excel can represent.
const EXCEL_SERIAL_LIMIT: f64 = 2_958_466.0;

// ---------------------------------------------------------------------------
// Spanish month table
// ---------------------------------------------------------------------------

/// (full name, abbreviation) indexed by month - 1.
const MONTHS: [(&str, &str); 12] = [
    ("enero", "ene"),
    ("febrero", "feb"),
    ("marzo", "mar"),
    ("abril", "abr"),
    ("mayo", "may"),
    ("junio", "jun"),
    ("julio", "jul"),
    ("agosto", "ago"),
    ("septiembre", "sep"),
    ("octubre", "oct"),
    ("noviembre", "nov"),
    ("diciembre", "dic"),
];

pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|(full, abbr)| *full == name || *abbr == name)
        .map(|i| i as u32 + 1)
}

/// Lowercase Spanish month name, e.g. `enero`.
pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .get((month as usize).wrapping_sub(1))
        .map(|(full, _)| *full)
        .unwrap_or("")
}

/// Capitalized Spanish month name, e.g. `Enero`.
pub fn month_title(month: u32) -> String {
    let name = month_name(month);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum DateShape {
    DayNamedMonthYear,
    YearMonthDay,
    DayMonthYear,
}

static DATE_PATTERNS: LazyLock<Vec<(Regex, DateShape)>> = LazyLock::new(|| {
    [
        (r"^(\d{1,2})\s+de\s+(\p{L}+)\s+de\s+(\d{4})", DateShape::DayNamedMonthYear),
        (r"^(\d{1,2})/(\p{L}+)/(\d{4})", DateShape::DayNamedMonthYear),
        (r"^(\d{1,2})-(\p{L}+)-(\d{4})", DateShape::DayNamedMonthYear),
        (r"^(\d{4})-(\d{1,2})-(\d{1,2})", DateShape::YearMonthDay),
        (r"^(\d{1,2})/(\d{1,2})/(\d{4})", DateShape::DayMonthYear),
        (r"^(\d{1,2})-(\d{1,2})-(\d{4})", DateShape::DayMonthYear),
    ]
    .into_iter()
    .map(|(pattern, shape)| (Regex::new(pattern).expect("valid date pattern"), shape))
    .collect()
});

/// Day-first formats tried when none of the known shapes apply.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_shape(caps: &regex::Captures, shape: DateShape) -> Option<NaiveDate> {
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    match shape {
        DateShape::DayNamedMonthYear => {
            let month = month_number(caps.get(2)?.as_str())?;
            NaiveDate::from_ymd_opt(caps.get(3)?.as_str().parse().ok()?, month, num(1)?)
        }
        DateShape::YearMonthDay => {
            NaiveDate::from_ymd_opt(caps.get(1)?.as_str().parse().ok()?, num(2)?, num(3)?)
        }
        DateShape::DayMonthYear => {
            NaiveDate::from_ymd_opt(caps.get(3)?.as_str().parse().ok()?, num(2)?, num(1)?)
        }
    }
}

fn parse_date_fallback(text: &str) -> Option<NaiveDate> {
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            FALLBACK_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a free-form Spanish date such as `15 de enero de 2024`,
/// `15/ene/2024`, `2024-01-15` or `15/01/2024`. Returns `None` when the
/// text cannot be read as a calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }
    for (re, shape) in DATE_PATTERNS.iter() {
        let Some(caps) = re.captures(&text) else {
            continue;
        };
        if let Some(date) = parse_shape(&caps, *shape) {
            return Some(date);
        }
    }
    parse_date_fallback(&text)
}

/// Convert an Excel serial number to a timestamp (1900 date system).
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..EXCEL_SERIAL_LIMIT).contains(&serial) {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * SECONDS_PER_DAY as f64).round() as i64;
    base.checked_add_signed(Duration::try_seconds(seconds)?)
}

pub fn date_from_cell(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Empty => None,
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => excel_serial_to_datetime(*n).map(|dt| dt.date()),
        CellValue::Text(s) => parse_date(s),
    }
}

// ---------------------------------------------------------------------------
// Times
// ---------------------------------------------------------------------------

static TIME_HMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})").expect("valid time pattern"));
static TIME_HM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})").expect("valid time pattern"));
static TIME_COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3,4})").expect("valid time pattern"));

/// Parse a time of day written as `HH:MM:SS`, `HH:MM` or `HHMM` (3 or 4
/// digits).
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();

    if let Some(caps) = TIME_HMS.captures(text) {
        let (h, m, s) = (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
        if let Some(t) = NaiveTime::from_hms_opt(h, m, s) {
            return Some(t);
        }
    }
    if let Some(caps) = TIME_HM.captures(text) {
        let (h, m) = (caps[1].parse().ok()?, caps[2].parse().ok()?);
        if let Some(t) = NaiveTime::from_hms_opt(h, m, 0) {
            return Some(t);
        }
    }
    if let Some(caps) = TIME_COMPACT.captures(text) {
        let digits = &caps[1];
        let split = digits.len() - 2;
        let h = digits[..split].parse().ok()?;
        let m = digits[split..].parse().ok()?;
        return NaiveTime::from_hms_opt(h, m, 0);
    }
    None
}

pub fn time_from_cell(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        CellValue::Empty => None,
        CellValue::DateTime(dt) => Some(dt.time()),
        CellValue::Number(n) if (0.0..1.0).contains(n) => {
            let secs = (n * SECONDS_PER_DAY as f64).round() as u32;
            NaiveTime::from_num_seconds_from_midnight_opt(secs % SECONDS_PER_DAY as u32, 0)
        }
        other => parse_time(&other.as_text()),
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hours from `time_in` to `time_out`. A `time_out` earlier than `time_in`
/// is taken to be on the next day.
pub fn hours_between(time_in: NaiveTime, time_out: NaiveTime) -> f64 {
    let mut seconds = time_out.num_seconds_from_midnight() as i64
        - time_in.num_seconds_from_midnight() as i64;
    if time_out < time_in {
        seconds += SECONDS_PER_DAY;
    }
    round2(seconds as f64 / 3600.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShiftAnomaly {
    MissingValue,
    UnparsableTime(String),
    OutOfRange(f64),
}

/// Outcome of measuring one row's shift.
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftHours {
    Measured(f64),
    Defaulted(ShiftAnomaly),
}

impl ShiftHours {
    pub fn hours(&self) -> f64 {
        match self {
            Self::Measured(h) => *h,
            Self::Defaulted(_) => DEFAULT_SHIFT_HOURS,
        }
    }
}

/// Hours for one row given its raw check-in and check-out cells. Any
/// anomaly yields [`DEFAULT_SHIFT_HOURS`].
pub fn shift_hours(raw_in: &CellValue, raw_out: &CellValue) -> ShiftHours {
    if raw_in.is_empty() || raw_out.is_empty() {
        return ShiftHours::Defaulted(ShiftAnomaly::MissingValue);
    }
    let Some(time_in) = time_from_cell(raw_in) else {
        return ShiftHours::Defaulted(ShiftAnomaly::UnparsableTime(raw_in.as_text()));
    };
    let Some(time_out) = time_from_cell(raw_out) else {
        return ShiftHours::Defaulted(ShiftAnomaly::UnparsableTime(raw_out.as_text()));
    };
    let hours = hours_between(time_in, time_out);
    if (0.0..=24.0).contains(&hours) {
        ShiftHours::Measured(hours)
    } else {
        ShiftHours::Defaulted(ShiftAnomaly::OutOfRange(hours))
    }
}
