use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A single cell as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(n) => n.is_nan(),
            Self::DateTime(_) => false,
        }
    }

    /// Text form of the cell. Whole numbers drop their decimals so that
    /// `800.0` reads back as `"800"`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => format!("{n}"),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Intermediate representation of an input file before column resolution.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&CellValue::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Employee,
    Date,
    TimeIn,
    TimeOut,
}

impl Role {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Employee => "empleado",
            Self::Date => "fecha",
            Self::TimeIn => "hora_entrada",
            Self::TimeOut => "hora_salida",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A header chosen for a role: its position and normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub employee: Option<ResolvedColumn>,
    pub date: Option<ResolvedColumn>,
    pub time_in: Option<ResolvedColumn>,
    pub time_out: Option<ResolvedColumn>,
}

impl ColumnMap {
    pub fn get(&self, role: Role) -> Option<&ResolvedColumn> {
        match role {
            Role::Employee => self.employee.as_ref(),
            Role::Date => self.date.as_ref(),
            Role::TimeIn => self.time_in.as_ref(),
            Role::TimeOut => self.time_out.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, role: Role, column: ResolvedColumn) {
        let slot = match role {
            Role::Employee => &mut self.employee,
            Role::Date => &mut self.date,
            Role::TimeIn => &mut self.time_in,
            Role::TimeOut => &mut self.time_out,
        };
        *slot = Some(column);
    }

    /// Source indices of the check-in and check-out columns, when both exist.
    pub fn time_columns(&self) -> Option<(usize, usize)> {
        match (&self.time_in, &self.time_out) {
            (Some(time_in), Some(time_out)) => Some((time_in.index, time_out.index)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvent {
    pub employee_id: String,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub employee_id: String,
    pub year: i32,
    pub month: u32,
    pub total_hours: f64,
    pub days_worked: u32,
    pub avg_daily_hours: f64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

/// Human-readable diagnostics accumulated over one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<String>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
