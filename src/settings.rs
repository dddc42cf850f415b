use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{HrError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Monthly totals below this are highlighted as low.
    #[serde(default = "default_low_hours")]
    pub low_hours: f64,
    /// Monthly totals above this are highlighted as high.
    #[serde(default = "default_high_hours")]
    pub high_hours: f64,
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_low_hours() -> f64 {
    120.0
}

fn default_high_hours() -> f64 {
    200.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            low_hours: default_low_hours(),
            high_hours: default_high_hours(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("bioadmin-hr")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn parse_settings(content: &str) -> Settings {
    serde_json::from_str(content).unwrap_or_default()
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        parse_settings(&content)
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| HrError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            output_dir: "/tmp/reportes".to_string(),
            low_hours: 100.0,
            high_hours: 180.0,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let loaded = parse_settings(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(loaded.output_dir, "/tmp/reportes");
        assert_eq!(loaded.low_hours, 100.0);
        assert_eq!(loaded.high_hours, 180.0);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.output_dir, ".");
        assert_eq!(s.low_hours, 120.0);
        assert_eq!(s.high_hours, 200.0);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let s = parse_settings(r#"{"high_hours": 190}"#);
        assert_eq!(s.output_dir, ".");
        assert_eq!(s.low_hours, 120.0);
        assert_eq!(s.high_hours, 190.0);
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let s = parse_settings("{ not json");
        assert_eq!(s.low_hours, 120.0);
    }
}
