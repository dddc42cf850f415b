use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::aggregator::{aggregate, normalize};
use crate::columns::{normalize_header, resolve};
use crate::error::{HrError, Result};
use crate::loader::load_table;
use crate::models::{ErrorLog, MonthlySummary};
use crate::reports::Thresholds;
use crate::xlsx;

pub struct Outcome {
    pub summaries: Vec<MonthlySummary>,
    pub output: PathBuf,
    pub bytes: u64,
}

impl Outcome {
    pub fn employee_count(&self) -> usize {
        let mut ids: Vec<&str> = self.summaries.iter().map(|s| s.employee_id.as_str()).collect();
        ids.dedup();
        ids.len()
    }
}

/// `Reporte_HR_<stem>_<YYYYmmdd_HHMM>.xlsx`
pub fn default_output_name(input: &Path, now: NaiveDateTime) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "datos".to_string());
    format!("Reporte_HR_{stem}_{}.xlsx", now.format("%Y%m%d_%H%M"))
}

/// Load `input`, compute monthly summaries and write the workbook to
/// `output`. Non-fatal row problems are appended to `log`, which keeps
/// whatever was collected if a later stage fails.
pub fn run(
    input: &Path,
    output: &Path,
    thresholds: Thresholds,
    generated_at: NaiveDateTime,
    log: &mut ErrorLog,
) -> Result<Outcome> {
    let mut table = load_table(input)?;
    table.headers = table.headers.iter().map(|h| normalize_header(h)).collect();

    let map = resolve(&table.headers);
    debug!(?map, "resolved columns");

    let events = normalize(&table, &map, log)?;
    let summaries = aggregate(&events);
    if summaries.is_empty() {
        return Err(HrError::NoSummaries);
    }

    let mut workbook = xlsx::render_summaries(&summaries, generated_at, thresholds)?;
    let bytes = xlsx::save(&mut workbook, output)?;

    info!(
        summaries = summaries.len(),
        warnings = log.len(),
        "report complete"
    );
    Ok(Outcome {
        summaries,
        output: output.to_path_buf(),
        bytes,
    })
}
