//! # Settings Loader
//!
//! Centralized settings loading for the dashboard client. Settings live in a
//! `settings.json` file holding the API base URL, the year span covered by the
//! time slider, animation pacing and the fallback ticker.
//!
//! Every field has a default, so a partial file is valid and a missing file
//! falls back to [`DashboardSettings::default`].
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/dashboard.json")?;
//!
//! // Use the given path, then ./settings.json, then built-in defaults
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_settings_or_default(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
pub use models::DashboardSettings;

/// Loads and validates settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<DashboardSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: DashboardSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    validate(&settings).with_context(|| format!("Validating settings in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from a default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<DashboardSettings> {
    load_settings("settings.json")
}

/// Tries the provided path, then the default location. Returns None only if no settings file is found anywhere.
///
/// A file that exists but fails to parse is an error rather than a silent fallback.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<DashboardSettings>> {
    if let Some(settings_path) = path {
        if settings_file_exists(settings_path) {
            return load_settings(settings_path).map(Some);
        }
        tracing::warn!(path = %settings_path.display(), "settings file not found, trying settings.json");
    }

    if default_settings_exist() {
        return load_default_settings().map(Some);
    }

    Ok(None)
}

/// Same as [`load_settings_with_fallback`] but substitutes built-in defaults when nothing is found
pub fn load_settings_or_default(path: Option<&PathBuf>) -> Result<DashboardSettings> {
    match load_settings_with_fallback(path)? {
        Some(settings) => Ok(settings),
        None => {
            tracing::info!("no settings file found, using defaults");
            Ok(DashboardSettings::default())
        }
    }
}

/// Rejects settings the dashboard cannot run with
pub fn validate(settings: &DashboardSettings) -> Result<()> {
    if settings.end_year < settings.start_year {
        bail!(
            "end_year ({}) is before start_year ({})",
            settings.end_year,
            settings.start_year
        );
    }
    let span = i64::from(settings.end_year) - i64::from(settings.start_year) + 1;
    if span > MAX_YEAR_SPAN {
        bail!("year span of {span} exceeds the {MAX_YEAR_SPAN} year limit");
    }
    if settings.default_symbol.trim().is_empty() {
        bail!("default_symbol must not be empty");
    }
    if settings.api_base_url.trim().is_empty() {
        bail!("api_base_url must not be empty");
    }
    Ok(())
}

/// Longest year span the time slider will lay out.
pub const MAX_YEAR_SPAN: i64 = 100;

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists("settings.json")
}
