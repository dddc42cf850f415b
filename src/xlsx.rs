use std::io::Write;
use std::path::Path;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, info};

use crate::dates::month_title;
use crate::error::{HrError, Result};
use crate::fmt;
use crate::models::MonthlySummary;
use crate::reports::{self, Highlight, Report, Thresholds};

pub const SHEET_EXECUTIVE: &str = "Resumen Ejecutivo";
pub const SHEET_DETAIL: &str = "Detalle Mensual";
pub const SHEET_EMPLOYEES: &str = "Análisis por Empleado";
pub const SHEET_STATISTICS: &str = "Estadísticas";

const HEADER_BLUE: u32 = 0x2F75B5;
const ALERT_RED: u32 = 0xFF9999;
const INFO_BLUE: u32 = 0x99CCFF;
const MAX_COLUMN_WIDTH: usize = 50;

const DETAIL_HEADERS: &[&str] = &[
    "Empleado",
    "Año",
    "Mes",
    "Total Horas",
    "Días Trabajados",
    "Promedio Diario",
    "Fecha Inicio",
    "Fecha Fin",
];

const EMPLOYEE_HEADERS: &[&str] = &[
    "Empleado",
    "Total Horas Acumuladas",
    "Promedio Mensual",
    "Desviación Estándar",
    "Mes Mínimo",
    "Mes Máximo",
    "Total Días",
    "Promedio Días/Mes",
    "Horas Promedio/Día",
];

const MONTH_HEADERS: &[&str] = &[
    "Año",
    "Mes",
    "Total Horas",
    "Promedio por Empleado",
    "Empleados Activos",
];

struct Formats {
    title: Format,
    header: Format,
    bold: Format,
    low: Format,
    high: Format,
}

impl Formats {
    fn new() -> Self {
        let header = Format::new()
            .set_font_name("Arial")
            .set_font_size(12)
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(HEADER_BLUE)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        Self {
            title: header.clone().set_font_size(16),
            header,
            bold: Format::new().set_bold(),
            low: Format::new().set_background_color(ALERT_RED),
            high: Format::new().set_background_color(INFO_BLUE),
        }
    }

    fn highlight(&self, highlight: Highlight) -> Option<&Format> {
        match highlight {
            Highlight::None => None,
            Highlight::Low => Some(&self.low),
            Highlight::High => Some(&self.high),
        }
    }
}

/// Writes cells while tracking the widest value per column.
struct SheetWriter<'a> {
    sheet: &'a mut Worksheet,
    widths: Vec<usize>,
}

impl<'a> SheetWriter<'a> {
    fn new(workbook: &'a mut Workbook, name: &str) -> Result<Self> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        Ok(Self {
            sheet,
            widths: Vec::new(),
        })
    }

    fn track(&mut self, col: u16, len: usize) {
        let col = col as usize;
        if self.widths.len() <= col {
            self.widths.resize(col + 1, 0);
        }
        self.widths[col] = self.widths[col].max(len);
    }

    fn text(&mut self, row: u32, col: u16, value: &str, format: Option<&Format>) -> Result<()> {
        match format {
            Some(f) => self.sheet.write_string_with_format(row, col, value, f)?,
            None => self.sheet.write_string(row, col, value)?,
        };
        self.track(col, value.chars().count());
        Ok(())
    }

    fn number(&mut self, row: u32, col: u16, value: f64, format: Option<&Format>) -> Result<()> {
        match format {
            Some(f) => self.sheet.write_number_with_format(row, col, value, f)?,
            None => self.sheet.write_number(row, col, value)?,
        };
        self.track(col, value.to_string().len());
        Ok(())
    }

    fn header_row(&mut self, row: u32, headers: &[&str], format: &Format) -> Result<()> {
        for (col, header) in headers.iter().enumerate() {
            self.text(row, col as u16, header, Some(format))?;
        }
        Ok(())
    }

    /// Merged cells do not count towards column widths.
    fn banner(
        &mut self,
        first_row: u32,
        last_row: u32,
        last_col: u16,
        value: &str,
        format: &Format,
    ) -> Result<()> {
        self.sheet.merge_range(first_row, 0, last_row, last_col, value, format)?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        let SheetWriter { sheet, widths } = self;
        for (col, width) in widths.into_iter().enumerate() {
            if width == 0 {
                continue;
            }
            let width = (width + 2).min(MAX_COLUMN_WIDTH);
            sheet.set_column_width(col as u16, width as f64)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sheets
// ---------------------------------------------------------------------------

fn add_executive_sheet(workbook: &mut Workbook, report: &Report, formats: &Formats) -> Result<()> {
    let e = &report.executive;
    let mut w = SheetWriter::new(workbook, SHEET_EXECUTIVE)?;

    w.banner(0, 2, 5, "REPORTE DE HORAS TRABAJADAS - RESUMEN EJECUTIVO", &formats.title)?;

    w.text(4, 0, "Fecha de Generación:", None)?;
    w.text(4, 1, &fmt::long_date(e.generated_at.date()), None)?;
    w.text(5, 0, "Total de Empleados:", None)?;
    w.number(5, 1, e.employee_count as f64, None)?;
    w.text(6, 0, "Período Analizado:", None)?;
    w.text(6, 1, &e.period_label(), None)?;

    w.banner(8, 8, 5, "ESTADÍSTICAS GENERALES", &formats.header)?;
    for (i, (label, value)) in e.statistics().iter().enumerate() {
        let row = 10 + i as u32;
        w.text(row, 0, label, None)?;
        w.text(row, 1, value, None)?;
    }
    w.finish()
}

fn add_detail_sheet(workbook: &mut Workbook, report: &Report, formats: &Formats) -> Result<()> {
    let mut w = SheetWriter::new(workbook, SHEET_DETAIL)?;
    w.header_row(0, DETAIL_HEADERS, &formats.header)?;

    for (i, detail) in report.detail.iter().enumerate() {
        let row = 1 + i as u32;
        let s = &detail.summary;
        w.text(row, 0, &s.employee_id, None)?;
        w.number(row, 1, s.year as f64, None)?;
        w.text(row, 2, &month_title(s.month), None)?;
        w.number(row, 3, s.total_hours, formats.highlight(detail.highlight))?;
        w.number(row, 4, s.days_worked as f64, None)?;
        w.number(row, 5, s.avg_daily_hours, None)?;
        w.text(row, 6, &fmt::short_date(s.period_start), None)?;
        w.text(row, 7, &fmt::short_date(s.period_end), None)?;
    }

    let last_col = DETAIL_HEADERS.len() as u16 - 1;
    w.sheet.autofilter(0, 0, report.detail.len() as u32, last_col)?;
    w.finish()
}

fn add_employee_sheet(workbook: &mut Workbook, report: &Report, formats: &Formats) -> Result<()> {
    let mut w = SheetWriter::new(workbook, SHEET_EMPLOYEES)?;
    w.header_row(0, EMPLOYEE_HEADERS, &formats.header)?;

    for (i, a) in report.employees.iter().enumerate() {
        let row = 1 + i as u32;
        w.text(row, 0, &a.employee_id, None)?;
        w.number(row, 1, a.total_hours, None)?;
        w.number(row, 2, a.mean_monthly_hours, None)?;
        w.number(row, 3, a.std_monthly_hours, None)?;
        w.number(row, 4, a.min_monthly_hours, None)?;
        w.number(row, 5, a.max_monthly_hours, None)?;
        w.number(row, 6, a.total_days as f64, None)?;
        w.number(row, 7, a.mean_days, None)?;
        w.number(row, 8, a.mean_daily_hours, None)?;
    }
    w.finish()
}

fn add_statistics_sheet(workbook: &mut Workbook, report: &Report, formats: &Formats) -> Result<()> {
    let mut w = SheetWriter::new(workbook, SHEET_STATISTICS)?;

    w.banner(0, 2, 7, "ANÁLISIS ESTADÍSTICO DE HORAS TRABAJADAS", &formats.header)?;
    w.text(4, 0, "RESUMEN POR MES", Some(&formats.header))?;
    w.header_row(6, MONTH_HEADERS, &formats.bold)?;

    for (i, m) in report.months.iter().enumerate() {
        let row = 7 + i as u32;
        w.number(row, 0, m.year as f64, None)?;
        w.text(row, 1, &month_title(m.month), None)?;
        w.number(row, 2, m.total_hours, None)?;
        w.number(row, 3, m.mean_hours_per_employee, None)?;
        w.number(row, 4, m.active_employees as f64, None)?;
    }
    w.finish()
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Lay out a computed report as a four-sheet workbook.
pub fn render(report: &Report) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    add_executive_sheet(&mut workbook, report, &formats)?;
    add_detail_sheet(&mut workbook, report, &formats)?;
    add_employee_sheet(&mut workbook, report, &formats)?;
    add_statistics_sheet(&mut workbook, report, &formats)?;

    debug!(
        detail_rows = report.detail.len(),
        employees = report.employees.len(),
        months = report.months.len(),
        "rendered workbook"
    );
    Ok(workbook)
}

/// Build and lay out the report for `summaries` in one step.
pub fn render_summaries(
    summaries: &[MonthlySummary],
    generated_at: NaiveDateTime,
    thresholds: Thresholds,
) -> Result<Workbook> {
    let report = reports::build(summaries, generated_at, thresholds)?;
    render(&report)
}

/// Serialize the workbook and move it into place at `path`. Nothing is left
/// at `path` if any step fails. Returns the number of bytes written.
pub fn save(workbook: &mut Workbook, path: &Path) -> Result<u64> {
    let buffer = workbook.save_to_buffer()?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&buffer)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| HrError::Io(e.error))?;

    info!(bytes = buffer.len(), "wrote {}", path.display());
    Ok(buffer.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::dates::round2;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(employee: &str, month: u32, total: f64, days: u32) -> MonthlySummary {
        MonthlySummary {
            employee_id: employee.to_string(),
            year: 2024,
            month,
            total_hours: total,
            days_worked: days,
            avg_daily_hours: round2(total / days as f64),
            period_start: ymd(2024, month, 1),
            period_end: ymd(2024, month, days),
        }
    }

    fn sample() -> Vec<MonthlySummary> {
        vec![
            summary("Ana López", 1, 26.75, 3),
            summary("Ana López", 2, 9.0, 1),
            summary("Juan Pérez", 1, 26.5, 3),
            summary("María García", 1, 212.33, 25),
        ]
    }

    fn generated_at() -> NaiveDateTime {
        ymd(2024, 3, 1).and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_render_requires_summaries() {
        assert!(matches!(
            render_summaries(&[], generated_at(), Thresholds::default()),
            Err(HrError::NoSummaries)
        ));
    }

    #[test]
    fn test_save_writes_file_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reporte.xlsx");
        let mut wb = render_summaries(&sample(), generated_at(), Thresholds::default()).unwrap();
        let bytes = save(&mut wb, &path).unwrap();
        assert!(bytes > 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), bytes);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_failure_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // a directory already occupies the target path
        let path = dir.path().join("reporte.xlsx");
        std::fs::create_dir(&path).unwrap();
        let mut wb = render_summaries(&sample(), generated_at(), Thresholds::default()).unwrap();
        assert!(save(&mut wb, &path).is_err());
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(path.is_dir());
    }

    #[cfg(feature = "excel")]
    mod readback {
        use calamine::{Data, Reader};

        use super::*;

        fn render_to(path: &Path, summaries: &[MonthlySummary]) {
            let mut wb = render_summaries(summaries, generated_at(), Thresholds::default()).unwrap();
            save(&mut wb, path).unwrap();
        }

        fn sheet_rows(path: &Path, name: &str) -> Vec<Vec<Data>> {
            let mut workbook = calamine::open_workbook_auto(path).unwrap();
            let range = workbook.worksheet_range(name).unwrap();
            range.rows().map(|r| r.to_vec()).collect()
        }

        fn float(cell: &Data) -> f64 {
            match cell {
                Data::Float(f) => *f,
                Data::Int(i) => *i as f64,
                other => panic!("expected a number, got {other:?}"),
            }
        }

        #[test]
        fn test_workbook_has_four_named_sheets() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("reporte.xlsx");
            render_to(&path, &sample());
            let workbook = calamine::open_workbook_auto(&path).unwrap();
            assert_eq!(
                workbook.sheet_names(),
                vec![SHEET_EXECUTIVE, SHEET_DETAIL, SHEET_EMPLOYEES, SHEET_STATISTICS]
            );
        }

        #[test]
        fn test_monthly_detail_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("reporte.xlsx");
            let summaries = sample();
            render_to(&path, &summaries);

            let rows = sheet_rows(&path, SHEET_DETAIL);
            assert_eq!(rows.len(), summaries.len() + 1);
            assert_eq!(rows[0][0], Data::String("Empleado".into()));
            for (row, s) in rows.iter().skip(1).zip(&summaries) {
                assert_eq!(row[0], Data::String(s.employee_id.clone()));
                assert_eq!(float(&row[1]), s.year as f64);
                assert_eq!(row[2], Data::String(month_title(s.month)));
                assert_eq!(round2(float(&row[3])), s.total_hours);
                assert_eq!(float(&row[4]), s.days_worked as f64);
                assert_eq!(row[6], Data::String(fmt::short_date(s.period_start)));
            }
        }

        #[test]
        fn test_executive_sheet_content() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("reporte.xlsx");
            render_to(&path, &sample());

            let mut workbook = calamine::open_workbook_auto(&path).unwrap();
            let range = workbook.worksheet_range(SHEET_EXECUTIVE).unwrap();
            let text = |row: u32, col: u32| range.get_value((row, col)).cloned();
            assert_eq!(text(4, 1), Some(Data::String("1 de marzo de 2024".into())));
            assert_eq!(text(5, 1).map(|d| float(&d)), Some(3.0));
            assert_eq!(text(6, 1), Some(Data::String("enero 2024 - febrero 2024".into())));
            assert_eq!(text(12, 1), Some(Data::String("María García".into())));
        }

        #[test]
        fn test_render_twice_gives_identical_sheets() {
            let dir = tempfile::tempdir().unwrap();
            let first = dir.path().join("a.xlsx");
            let second = dir.path().join("b.xlsx");
            render_to(&first, &sample());
            render_to(&second, &sample());
            for name in [SHEET_EXECUTIVE, SHEET_DETAIL, SHEET_EMPLOYEES, SHEET_STATISTICS] {
                assert_eq!(sheet_rows(&first, name), sheet_rows(&second, name), "{name}");
            }
        }
    }
}
