use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::dates::round2;
use crate::error::{HrError, Result};
use crate::fmt;
use crate::models::MonthlySummary;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: 120.0,
            high: 200.0,
        }
    }
}

impl From<&Settings> for Thresholds {
    fn from(settings: &Settings) -> Self {
        Self {
            low: settings.low_hours,
            high: settings.high_hours,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Low,
    High,
}

impl Thresholds {
    pub fn classify(&self, total_hours: f64) -> Highlight {
        if total_hours < self.low {
            Highlight::Low
        } else if total_hours > self.high {
            Highlight::High
        } else {
            Highlight::None
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; a single value has none and reports 0.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

// ---------------------------------------------------------------------------
// Executive summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutiveSummary {
    pub generated_at: NaiveDateTime,
    pub employee_count: usize,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_hours: f64,
    pub mean_monthly_hours: f64,
    pub top_employee: String,
    pub max_monthly_hours: f64,
    pub min_monthly_hours: f64,
    pub mean_days_worked: f64,
}

impl ExecutiveSummary {
    /// The six labelled statistics shown under "ESTADÍSTICAS GENERALES".
    pub fn statistics(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Horas Registradas", fmt::hours(self.total_hours)),
            ("Promedio Mensual por Empleado", fmt::plain_hours(self.mean_monthly_hours)),
            ("Empleado con Más Horas", self.top_employee.clone()),
            ("Máximo Horas en un Mes", fmt::plain_hours(self.max_monthly_hours)),
            ("Mínimo Horas en un Mes", fmt::plain_hours(self.min_monthly_hours)),
            ("Promedio de Días Trabajados", fmt::days(self.mean_days_worked)),
        ]
    }

    pub fn period_label(&self) -> String {
        format!(
            "{} - {}",
            fmt::month_year(self.period_start),
            fmt::month_year(self.period_end)
        )
    }
}

fn executive_summary(summaries: &[MonthlySummary], generated_at: NaiveDateTime) -> Result<ExecutiveSummary> {
    let first = summaries.first().ok_or(HrError::NoSummaries)?;

    let mut employees: Vec<&str> = summaries.iter().map(|s| s.employee_id.as_str()).collect();
    employees.sort_unstable();
    employees.dedup();

    // First row with the highest total wins ties.
    let mut top = first;
    for s in summaries {
        if s.total_hours > top.total_hours {
            top = s;
        }
    }

    let totals: Vec<f64> = summaries.iter().map(|s| s.total_hours).collect();
    let days: Vec<f64> = summaries.iter().map(|s| s.days_worked as f64).collect();

    Ok(ExecutiveSummary {
        generated_at,
        employee_count: employees.len(),
        period_start: summaries.iter().map(|s| s.period_start).min().unwrap_or(first.period_start),
        period_end: summaries.iter().map(|s| s.period_end).max().unwrap_or(first.period_end),
        total_hours: round2(totals.iter().sum()),
        mean_monthly_hours: round2(mean(&totals)),
        top_employee: top.employee_id.clone(),
        max_monthly_hours: totals.iter().copied().fold(f64::MIN, f64::max),
        min_monthly_hours: totals.iter().copied().fold(f64::MAX, f64::min),
        mean_days_worked: mean(&days),
    })
}

// ---------------------------------------------------------------------------
// Monthly detail
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub summary: MonthlySummary,
    pub highlight: Highlight,
}

// ---------------------------------------------------------------------------
// Per-employee analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeAnalysis {
    pub employee_id: String,
    pub total_hours: f64,
    pub mean_monthly_hours: f64,
    pub std_monthly_hours: f64,
    pub min_monthly_hours: f64,
    pub max_monthly_hours: f64,
    pub total_days: u32,
    pub mean_days: f64,
    pub mean_daily_hours: f64,
}

fn employee_analysis(summaries: &[MonthlySummary]) -> Vec<EmployeeAnalysis> {
    let mut groups: BTreeMap<&str, Vec<&MonthlySummary>> = BTreeMap::new();
    for s in summaries {
        groups.entry(s.employee_id.as_str()).or_default().push(s);
    }

    groups
        .into_iter()
        .map(|(employee_id, rows)| {
            let totals: Vec<f64> = rows.iter().map(|s| s.total_hours).collect();
            let days: Vec<f64> = rows.iter().map(|s| s.days_worked as f64).collect();
            let daily: Vec<f64> = rows.iter().map(|s| s.avg_daily_hours).collect();
            EmployeeAnalysis {
                employee_id: employee_id.to_string(),
                total_hours: round2(totals.iter().sum()),
                mean_monthly_hours: round2(mean(&totals)),
                std_monthly_hours: round2(sample_std(&totals)),
                min_monthly_hours: totals.iter().copied().fold(f64::MAX, f64::min),
                max_monthly_hours: totals.iter().copied().fold(f64::MIN, f64::max),
                total_days: rows.iter().map(|s| s.days_worked).sum(),
                mean_days: round2(mean(&days)),
                mean_daily_hours: round2(mean(&daily)),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Month-level statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthStatistics {
    pub year: i32,
    pub month: u32,
    pub total_hours: f64,
    pub mean_hours_per_employee: f64,
    pub active_employees: usize,
}

fn month_statistics(summaries: &[MonthlySummary]) -> Vec<MonthStatistics> {
    let mut groups: BTreeMap<(i32, u32), Vec<&MonthlySummary>> = BTreeMap::new();
    for s in summaries {
        groups.entry((s.year, s.month)).or_default().push(s);
    }

    groups
        .into_iter()
        .map(|((year, month), rows)| {
            let totals: Vec<f64> = rows.iter().map(|s| s.total_hours).collect();
            let mut employees: Vec<&str> = rows.iter().map(|s| s.employee_id.as_str()).collect();
            employees.sort_unstable();
            employees.dedup();
            MonthStatistics {
                year,
                month,
                total_hours: round2(totals.iter().sum()),
                mean_hours_per_employee: round2(mean(&totals)),
                active_employees: employees.len(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub executive: ExecutiveSummary,
    pub detail: Vec<DetailRow>,
    pub employees: Vec<EmployeeAnalysis>,
    pub months: Vec<MonthStatistics>,
}

/// Compute the four report sheets from the monthly summaries. Fails with
/// [`HrError::NoSummaries`] when there is nothing to report.
pub fn build(
    summaries: &[MonthlySummary],
    generated_at: NaiveDateTime,
    thresholds: Thresholds,
) -> Result<Report> {
    let executive = executive_summary(summaries, generated_at)?;
    let detail = summaries
        .iter()
        .map(|s| DetailRow {
            summary: s.clone(),
            highlight: thresholds.classify(s.total_hours),
        })
        .collect();
    Ok(Report {
        executive,
        detail,
        employees: employee_analysis(summaries),
        months: month_statistics(summaries),
    })
}
