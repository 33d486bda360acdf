//! # Settings Loader
//!
//! Loads the parser settings (`ParserSettings`) used by the tax P&L parser from JSON files.
//! Every field of the settings file is optional; anything left out keeps the value that
//! matches the broker's standard export, so an empty object `{}` is a valid settings file.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/pnl_settings.json")?;
//!
//! // Load optional settings (returns None if no path is provided)
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::ParserSettings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<ParserSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: ParserSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<ParserSettings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Resolves the settings to use: the explicit path if given (a broken explicit file is an
/// error), else `settings.json` in the current directory if it exists, else the defaults.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<ParserSettings> {
    load_settings_with_fallback_in(path, Path::new("."))
}

/// [`load_settings_with_fallback`] with `settings.json` looked up in `dir`.
pub fn load_settings_with_fallback_in(
    path: Option<&PathBuf>,
    dir: &Path,
) -> Result<ParserSettings> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(settings);
    }

    let default_file = dir.join(DEFAULT_SETTINGS_FILE);
    if settings_file_exists(&default_file) {
        return load_settings(default_file);
    }

    Ok(ParserSettings::default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}
