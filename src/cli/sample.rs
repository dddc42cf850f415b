use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use colored::Colorize;

use crate::error::Result;

/// Four employees over three January days and one February day.
pub const SAMPLE_CSV: &str = "\
Empleado,Fecha,Hora_Entrada,Hora_Salida
Juan Pérez,15 de enero de 2024,08:00,17:00
María García,15 de enero de 2024,08:30,17:30
Carlos Rodríguez,15 de enero de 2024,09:00,18:00
Ana López,15 de enero de 2024,08:15,17:15
Juan Pérez,16 de enero de 2024,08:05,17:05
María García,16 de enero de 2024,08:25,17:25
Carlos Rodríguez,16 de enero de 2024,09:10,18:10
Ana López,16 de enero de 2024,08:20,17:20
Juan Pérez,17 de enero de 2024,08:00,16:30
María García,17 de enero de 2024,08:30,17:00
Carlos Rodríguez,17 de enero de 2024,09:00,17:45
Ana López,17 de enero de 2024,08:15,17:00
Juan Pérez,15 de febrero de 2024,08:10,17:10
María García,15 de febrero de 2024,08:35,17:35
Carlos Rodríguez,15 de febrero de 2024,09:05,18:05
Ana López,15 de febrero de 2024,08:25,17:25
";

pub fn sample_file_name(now: NaiveDateTime) -> String {
    format!("ejemplo_bioadmin_{}.csv", now.format("%Y%m%d_%H%M"))
}

pub fn write_sample(dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
    let path = dir.join(sample_file_name(now));
    std::fs::write(&path, SAMPLE_CSV)?;
    Ok(path)
}

pub fn run() -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let path = write_sample(Path::new("."), now)?;
    println!(
        "{} {}",
        "✅ Archivo de ejemplo generado:".green(),
        path.display()
    );
    println!("💡 Puede usar este archivo para probar la aplicación");
    Ok(())
}
