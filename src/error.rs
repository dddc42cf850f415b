use std::path::PathBuf;

use thiserror::Error;

use crate::models::Role;

#[derive(Error, Debug)]
pub enum HrError {
    #[error("No se especificó archivo de entrada (use --help para ver las opciones)")]
    NoInput,

    #[error("El archivo no existe: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Formato de archivo no soportado: {0}")]
    UnsupportedFormat(String),

    #[error("No se pudo leer el archivo con ningún encoding: {}", .0.display())]
    Encoding(PathBuf),

    #[error("El archivo está vacío")]
    EmptyInput,

    #[error("No se encontró la columna obligatoria: {0}")]
    MissingColumn(Role),

    #[error("No hay datos procesados para el reporte")]
    NoSummaries,

    #[error("Error al generar reporte Excel: {0}")]
    Render(#[from] rust_xlsxwriter::XlsxError),

    #[error("Error al leer Excel: {0}")]
    Excel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, HrError>;
