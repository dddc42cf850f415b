use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE: &str = "\
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

/// Runs the binary with HOME pointed at `home` so no real settings are read.
fn bioadmin(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bioadmin-hr").unwrap();
    cmd.env("HOME", home).current_dir(home);
    cmd
}

#[test]
fn test_process_fixture_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("marcajes.csv");
    std::fs::write(&input, FIXTURE).unwrap();
    let output = dir.path().join("reporte.xlsx");

    bioadmin(dir.path())
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Empleados procesados: 4"))
        .stdout(predicate::str::contains("Registros mensuales: 8"))
        .stdout(predicate::str::contains("Carlos Rodríguez"))
        .stdout(predicate::str::contains("35.75"))
        .stdout(predicate::str::contains("Advertencias").not());

    assert!(output.exists());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_default_output_name_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marcajes.csv"), FIXTURE).unwrap();

    bioadmin(dir.path()).arg("marcajes.csv").assert().success();

    let reports: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("Reporte_HR_marcajes_") && name.ends_with(".xlsx"))
        .collect();
    assert_eq!(reports.len(), 1);
}

#[test]
fn test_sample_writes_fixture() {
    let dir = tempfile::tempdir().unwrap();

    bioadmin(dir.path())
        .arg("--sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archivo de ejemplo generado"));

    let sample = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .find(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with("ejemplo_bioadmin_"))
                .unwrap_or(false)
        })
        .unwrap();
    assert_eq!(std::fs::read_to_string(sample).unwrap(), FIXTURE);
}

#[test]
fn test_row_warnings_are_printed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("marcajes.csv");
    std::fs::write(
        &input,
        "Empleado,Fecha,Hora_Entrada,Hora_Salida\n\
         Juan Pérez,15 de enero de 2024,08:00,17:00\n\
         Juan Pérez,32 de enero de 2024,08:00,17:00\n\
         Juan Pérez,16 de enero de 2024,08:00,abc\n",
    )
    .unwrap();

    bioadmin(dir.path())
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("reporte.xlsx"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Advertencias (2)"))
        .stdout(predicate::str::contains("Fila 3: fecha no reconocida"))
        .stdout(predicate::str::contains("17.00"));
}

#[test]
fn test_missing_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    bioadmin(dir.path())
        .arg("no_existe.csv")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("El archivo no existe"));
}

#[test]
fn test_missing_date_column_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sin_fecha.csv");
    std::fs::write(&input, "Empleado,Hora_Entrada,Hora_Salida\nJuan,08:00,17:00\n").unwrap();
    let output = dir.path().join("reporte.xlsx");

    bioadmin(dir.path())
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("columna obligatoria: fecha"));

    assert!(!output.exists());
}

#[test]
fn test_no_arguments_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    bioadmin(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No se especificó archivo"));
}

#[test]
fn test_help_full_prints_guide() {
    let dir = tempfile::tempdir().unwrap();

    bioadmin(dir.path())
        .arg("--help-full")
        .assert()
        .success()
        .stdout(predicate::str::contains("GUÍA DE USO RÁPIDO"))
        .stdout(predicate::str::contains("Hora_Entrada"));
}

#[test]
fn test_init_config_creates_settings() {
    let dir = tempfile::tempdir().unwrap();

    bioadmin(dir.path())
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json"));

    let path = dir.path().join(".config/bioadmin-hr/settings.json");
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("\"low_hours\": 120.0"));
}
