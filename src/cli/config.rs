use colored::Colorize;

use crate::error::Result;
use crate::settings::{save_settings, settings_path, Settings};

pub fn init() -> Result<()> {
    let path = settings_path();
    if path.exists() {
        println!("La configuración ya existe: {}", path.display());
        return Ok(());
    }
    save_settings(&Settings::default())?;
    println!("{} {}", "✅ Configuración creada:".green(), path.display());
    Ok(())
}
