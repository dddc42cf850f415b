use std::path::Path;

use tracing::{debug, info};

use crate::error::{HrError, Result};
use crate::models::{CellValue, RawTable};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Encodings tried for `.csv` input, in order.
const CSV_ENCODINGS: &[TextEncoding] = &[
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Cp1252,
    TextEncoding::Iso8859_1,
];

/// Delimiters tried for `.txt` input, in order.
const TEXT_DELIMITERS: &[u8] = b"\t,;|";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Cp1252,
    Iso8859_1,
}

/// Windows-1252 code points for bytes 0x80..=0x9F; `None` marks bytes the
/// code page leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Cp1252 => "cp1252",
            Self::Iso8859_1 => "iso-8859-1",
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            Self::Latin1 | Self::Iso8859_1 => Some(bytes.iter().map(|&b| b as char).collect()),
            Self::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect(),
        }
    }
}

fn decode_with_fallback(path: &Path, bytes: &[u8]) -> Result<String> {
    for encoding in CSV_ENCODINGS {
        if let Some(text) = encoding.decode(bytes) {
            debug!(encoding = encoding.name(), "decoded {}", path.display());
            return Ok(text);
        }
        debug!(encoding = encoding.name(), "decode failed");
    }
    Err(HrError::Encoding(path.to_path_buf()))
}

fn text_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

/// Parse delimited text. The first non-blank record is the header row;
/// blank records are skipped and short records padded.
fn parse_delimited(content: &str, delimiter: u8) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut table = RawTable::default();
    let mut found_header = false;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if !found_header {
            table.headers = record.iter().map(|f| f.trim().to_string()).collect();
            found_header = true;
            continue;
        }
        let mut row: Vec<CellValue> = record.iter().map(text_cell).collect();
        if row.len() < table.headers.len() {
            row.resize(table.headers.len(), CellValue::Empty);
        }
        table.rows.push(row);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Input formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Csv,
    Text,
    #[cfg(feature = "excel")]
    Excel,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Text),
            #[cfg(feature = "excel")]
            "xlsx" | "xls" => Ok(Self::Excel),
            _ => Err(HrError::UnsupportedFormat(format!(".{ext}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Text => "texto delimitado",
            #[cfg(feature = "excel")]
            Self::Excel => "Excel",
        }
    }

    pub fn read(&self, path: &Path) -> Result<RawTable> {
        match self {
            Self::Csv => read_csv(path),
            Self::Text => read_text(path),
            #[cfg(feature = "excel")]
            Self::Excel => read_excel(path),
        }
    }
}

/// Read an attendance export into a [`RawTable`].
pub fn load_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(HrError::FileNotFound(path.to_path_buf()));
    }
    let format = InputFormat::from_path(path)?;
    let table = format.read(path)?;
    if table.rows.is_empty() {
        return Err(HrError::EmptyInput);
    }
    info!(
        format = format.name(),
        rows = table.rows.len(),
        columns = table.headers.len(),
        "loaded {}",
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let bytes = std::fs::read(path)?;
    let content = decode_with_fallback(path, &bytes)?;
    parse_delimited(&content, b',')
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

fn read_text(path: &Path) -> Result<RawTable> {
    let bytes = std::fs::read(path)?;
    let content = TextEncoding::Utf8
        .decode(&bytes)
        .ok_or_else(|| HrError::Encoding(path.to_path_buf()))?;

    for &delimiter in TEXT_DELIMITERS {
        let Ok(table) = parse_delimited(&content, delimiter) else {
            continue;
        };
        if table.headers.len() > 1 {
            debug!(delimiter = %(delimiter as char).escape_default(), "delimiter detected");
            return Ok(table);
        }
    }
    parse_delimited(&content, b',')
}

// ---------------------------------------------------------------------------
// Excel (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "excel")]
fn excel_cell(cell: &calamine::Data) -> CellValue {
    use calamine::Data;

    use crate::dates::excel_serial_to_datetime;

    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => text_cell(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| text_cell(s)),
        Data::DurationIso(s) => text_cell(s),
    }
}

#[cfg(feature = "excel")]
fn read_excel(path: &Path) -> Result<RawTable> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| HrError::Excel(format!("Failed to open workbook: {e}")))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(HrError::Excel(format!("Failed to read first sheet: {e}"))),
        None => return Err(HrError::EmptyInput),
    };

    let mut table = RawTable::default();
    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|c| excel_cell(c).is_empty()));
    if let Some(header) = rows.next() {
        table.headers = header.iter().map(|c| excel_cell(c).as_text()).collect();
    }
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(excel_cell).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.rows.push(cells);
    }
    Ok(table)
}
