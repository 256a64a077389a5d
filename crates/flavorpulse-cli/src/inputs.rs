//! File inputs and per-run dependencies shared by the scoring commands.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use flavorpulse_core::{AppConfig, ContentItem, TrendSignal};
use flavorpulse_demand::{AliasTable, CalibrationFile, CalibrationSource};

/// Reads a JSON array of content items.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of objects.
pub(crate) fn read_items(path: &Path) -> anyhow::Result<Vec<ContentItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read items file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("items file {} is not a JSON array of items", path.display()))
}

/// Reads a JSON trend signal.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub(crate) fn read_trend(path: &Path) -> anyhow::Result<TrendSignal> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trend file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("trend file {} is not a valid trend signal", path.display()))
}

/// Built-in aliases, extended by the configured alias file when one is set.
///
/// # Errors
///
/// Returns an error if the configured alias file cannot be loaded.
pub(crate) fn build_alias_table(config: &AppConfig) -> anyhow::Result<AliasTable> {
    let Some(path) = config.aliases_path.as_deref() else {
        return Ok(AliasTable::builtin().clone());
    };
    let file = flavorpulse_core::load_aliases(path)?;
    tracing::debug!(
        path = %path.display(),
        entries = file.aliases.len(),
        "loaded alias file"
    );
    Ok(AliasTable::builtin_with(&file.aliases))
}

/// The configured calibration source, refreshed and ready for lookups.
///
/// A table that fails to load is logged and still returned: it simply has no
/// buckets, so confidence stays uncalibrated.
pub(crate) fn load_calibration(config: &AppConfig) -> Option<CalibrationFile> {
    let path = config.calibration_path.as_deref()?;
    let source = CalibrationFile::new(path, Duration::from_secs(config.calibration_ttl_secs));
    if let Err(e) = source.refresh_if_stale() {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "calibration unavailable; confidence will not be calibrated"
        );
    }
    Some(source)
}
