use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::error::Result;
use crate::fmt::{format_bytes, thousands};
use crate::models::{ErrorLog, MonthlySummary};
use crate::pipeline::{self, default_output_name};
use crate::reports::Thresholds;
use crate::settings::load_settings;

/// Total hours and number of months per employee, in summary order.
pub(crate) fn employee_totals(summaries: &[MonthlySummary]) -> Vec<(&str, f64, usize)> {
    let mut totals: Vec<(&str, f64, usize)> = Vec::new();
    for s in summaries {
        match totals.last_mut() {
            Some((id, hours, months)) if *id == s.employee_id => {
                *hours += s.total_hours;
                *months += 1;
            }
            _ => totals.push((s.employee_id.as_str(), s.total_hours, 1)),
        }
    }
    totals
}

fn print_warnings(log: &ErrorLog) {
    if log.is_empty() {
        return;
    }
    println!();
    println!("{}", format!("⚠️  Advertencias ({}):", log.len()).yellow());
    for entry in log.entries() {
        println!("   {entry}");
    }
}

pub fn run(file: &Path, output: Option<&Path>) -> Result<()> {
    let settings = load_settings();
    let now = chrono::Local::now().naive_local();
    let output: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&settings.output_dir).join(default_output_name(file, now)),
    };

    super::guide::banner();
    println!("📁 Archivo entrada: {}", file.display());
    println!("📊 Archivo salida: {}", output.display());
    println!();
    println!("⚙️  Procesando archivo BioAdmin...");

    let mut log = ErrorLog::new();
    let result = pipeline::run(file, &output, Thresholds::from(&settings), now, &mut log);
    print_warnings(&log);
    let outcome = result?;

    println!("{}", "✅ Datos procesados correctamente".green());
    println!("👥 Empleados procesados: {}", outcome.employee_count());
    println!("📊 Registros mensuales: {}", outcome.summaries.len());

    let mut table = Table::new();
    table.set_header(vec!["Empleado", "Total Horas", "Meses"]);
    for (employee, hours, months) in employee_totals(&outcome.summaries) {
        table.add_row(vec![
            Cell::new(employee),
            Cell::new(thousands(hours)).set_alignment(CellAlignment::Right),
            Cell::new(months).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n📋 Resumen por empleado\n{table}");

    let location = std::fs::canonicalize(&outcome.output).unwrap_or(outcome.output.clone());
    println!();
    println!("{}", "✅ Reporte Excel generado exitosamente".green().bold());
    println!("📄 Ubicación: {}", location.display());
    println!("💾 Tamaño: {}", format_bytes(outcome.bytes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn summary(employee: &str, month: u32, total: f64) -> MonthlySummary {
        let day = NaiveDate::from_ymd_opt(2024, month, 15).unwrap();
        MonthlySummary {
            employee_id: employee.to_string(),
            year: 2024,
            month,
            total_hours: total,
            days_worked: 1,
            avg_daily_hours: total,
            period_start: day,
            period_end: day,
        }
    }

    #[test]
    fn test_employee_totals() {
        let summaries = vec![
            summary("Ana López", 1, 26.75),
            summary("Ana López", 2, 9.0),
            summary("Juan Pérez", 1, 26.5),
        ];
        let totals = employee_totals(&summaries);
        assert_eq!(totals, vec![("Ana López", 35.75, 2), ("Juan Pérez", 26.5, 1)]);
    }

    #[test]
    fn test_employee_totals_empty() {
        assert!(employee_totals(&[]).is_empty());
    }
}
