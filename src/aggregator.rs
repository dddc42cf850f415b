use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::columns::require_mandatory;
use crate::dates::{date_from_cell, round2, shift_hours, ShiftAnomaly, ShiftHours, DEFAULT_SHIFT_HOURS};
use crate::error::Result;
use crate::models::{ColumnMap, ErrorLog, MonthlySummary, NormalizedEvent, RawTable};

fn describe_anomaly(anomaly: &ShiftAnomaly) -> String {
    match anomaly {
        ShiftAnomaly::MissingValue => "hora de entrada o salida vacía".to_string(),
        ShiftAnomaly::UnparsableTime(raw) => format!("hora no reconocida '{raw}'"),
        ShiftAnomaly::OutOfRange(hours) => format!("duración fuera de rango ({hours:.2} h)"),
    }
}

/// Turn raw rows into dated, measured events. Rows without a readable date
/// or employee are dropped; unmeasurable shifts get the default hours. Every
/// such anomaly is appended to `log`.
pub fn normalize(table: &RawTable, map: &ColumnMap, log: &mut ErrorLog) -> Result<Vec<NormalizedEvent>> {
    let (employee_col, date_col) = require_mandatory(map)?;
    let times = map.time_columns();
    if times.is_none() {
        log.push(format!(
            "⚠️  No se encontraron columnas de hora, asumiendo {DEFAULT_SHIFT_HOURS} horas por día"
        ));
    }

    let mut events = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        // header is line 1 of the source file
        let line = row + 2;

        let raw_date = table.cell(row, date_col.index);
        let Some(date) = date_from_cell(raw_date) else {
            log.push(format!("Fila {line}: fecha no reconocida '{}'", raw_date.as_text()));
            continue;
        };

        let employee_id = table.cell(row, employee_col.index).as_text();
        if employee_id.is_empty() {
            log.push(format!("Fila {line}: empleado vacío"));
            continue;
        }

        let hours_worked = match times {
            Some((in_col, out_col)) => {
                let shift = shift_hours(table.cell(row, in_col), table.cell(row, out_col));
                if let ShiftHours::Defaulted(anomaly) = &shift {
                    log.push(format!(
                        "Fila {line}: {}, se asumen {DEFAULT_SHIFT_HOURS} horas",
                        describe_anomaly(anomaly)
                    ));
                }
                shift.hours()
            }
            None => DEFAULT_SHIFT_HOURS,
        };

        events.push(NormalizedEvent {
            employee_id,
            date,
            hours_worked,
            year: date.year(),
            month: date.month(),
        });
    }

    info!(
        rows = table.rows.len(),
        events = events.len(),
        "normalized attendance rows"
    );
    Ok(events)
}

struct MonthAccumulator {
    total: f64,
    days: u32,
    first: NaiveDate,
    last: NaiveDate,
}

/// Group events by (employee, year, month). Output is sorted by employee,
/// then year, then month.
pub fn aggregate(events: &[NormalizedEvent]) -> Vec<MonthlySummary> {
    let mut groups: BTreeMap<(&str, i32, u32), MonthAccumulator> = BTreeMap::new();
    for event in events {
        groups
            .entry((event.employee_id.as_str(), event.year, event.month))
            .and_modify(|acc| {
                acc.total += event.hours_worked;
                acc.days += 1;
                acc.first = acc.first.min(event.date);
                acc.last = acc.last.max(event.date);
            })
            .or_insert(MonthAccumulator {
                total: event.hours_worked,
                days: 1,
                first: event.date,
                last: event.date,
            });
    }

    let summaries: Vec<MonthlySummary> = groups
        .into_iter()
        .map(|((employee_id, year, month), acc)| {
            let total_hours = round2(acc.total);
            MonthlySummary {
                employee_id: employee_id.to_string(),
                year,
                month,
                total_hours,
                days_worked: acc.days,
                avg_daily_hours: round2(total_hours / acc.days as f64),
                period_start: acc.first,
                period_end: acc.last,
            }
        })
        .collect();
    debug!(summaries = summaries.len(), "aggregated monthly summaries");
    summaries
}
