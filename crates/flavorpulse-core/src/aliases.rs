use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One canonical ingredient and the spellings that should match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub canonical: String,
    pub variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AliasFile {
    pub aliases: Vec<AliasEntry>,
}

/// Load and validate an ingredient alias file from YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_aliases(path: &Path) -> Result<AliasFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AliasFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_aliases(&content)
}

/// Parse and validate alias YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_aliases(content: &str) -> Result<AliasFile, ConfigError> {
    let alias_file: AliasFile = serde_yaml::from_str(content)?;
    validate_aliases(&alias_file)?;
    Ok(alias_file)
}

fn validate_aliases(alias_file: &AliasFile) -> Result<(), ConfigError> {
    let mut seen_canonical = HashSet::new();

    for entry in &alias_file.aliases {
        let canonical = entry.canonical.trim().to_lowercase();
        if canonical.is_empty() {
            return Err(ConfigError::Validation(
                "alias canonical name must be non-empty".to_string(),
            ));
        }

        if entry.variants.iter().all(|v| v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "alias '{}' must list at least one non-empty variant",
                entry.canonical
            )));
        }

        if !seen_canonical.insert(canonical) {
            return Err(ConfigError::Validation(format!(
                "duplicate alias canonical name: '{}'",
                entry.canonical
            )));
        }
    }

    Ok(())
}
