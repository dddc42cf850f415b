pub mod config;
pub mod guide;
pub mod process;
pub mod sample;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bioadmin-hr",
    version,
    about = "Sistema BioAdmin HR - Procesamiento de Horas Trabajadas",
    after_help = "Ejemplos de uso:
  bioadmin-hr datos.csv
  bioadmin-hr datos.xlsx -o reporte_enero.xlsx
  bioadmin-hr --sample
  bioadmin-hr --help-full"
)]
pub struct Cli {
    /// Archivo BioAdmin a procesar (.csv, .xlsx, .xls, .txt)
    pub archivo: Option<PathBuf>,
    /// Archivo de salida para el reporte Excel
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Generar archivo de ejemplo para pruebas
    #[arg(long)]
    pub sample: bool,
    /// Mostrar ayuda completa con ejemplos
    #[arg(long = "help-full")]
    pub help_full: bool,
    /// Crear el archivo de configuración con los valores por defecto
    #[arg(long = "init-config")]
    pub init_config: bool,
}
