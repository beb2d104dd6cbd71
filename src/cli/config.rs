use std::path::Path;

use cashflow_analytics::error::{CashflowError, Result};
use cashflow_analytics::settings::{save_settings_to, Settings};

use super::{load, resolve_settings_path};

pub fn show(explicit: Option<&Path>) -> Result<()> {
    let path = resolve_settings_path(explicit);
    let settings = load(explicit);
    let source = if path.exists() { "" } else { " (not found, using defaults)" };
    eprintln!("Settings: {}{source}", path.display());
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub fn init(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve_settings_path(explicit);
    if path.exists() && !force {
        return Err(CashflowError::Other(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_settings_to(&path, &Settings::default())?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
