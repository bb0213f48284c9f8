use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Per-field description overrides: type qualifier -> field name -> description.
///
/// Loaded from a YAML (or JSON) file such as:
///
/// ```yaml
/// crate::dto::User:
///   name: Display name shown on the profile page
/// ```
pub type FieldOverrides = BTreeMap<String, BTreeMap<String, String>>;

/// Settings for one documentation run.
#[derive(Debug, Clone, Default)]
pub struct DocAnalyzerConfig {
    /// Prepended verbatim to every combined URL unless blank
    pub global_url_prefix: String,
    /// Descriptions that win over doc comments
    pub field_descriptions: Option<FieldOverrides>,
}

impl DocAnalyzerConfig {
    pub fn new(global_url_prefix: impl Into<String>) -> Self {
        Self {
            global_url_prefix: global_url_prefix.into(),
            field_descriptions: None,
        }
    }

    pub fn with_field_descriptions(mut self, overrides: FieldOverrides) -> Self {
        self.field_descriptions = Some(overrides);
        self
    }
}

/// Loads the override table from a YAML or JSON file.
pub fn load_field_overrides(path: &Path) -> Result<FieldOverrides> {
    debug!("Loading field descriptions from {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read field descriptions: {}", path.display()))?;
    let overrides: FieldOverrides = if content.trim().is_empty() {
        FieldOverrides::new()
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid field descriptions file: {}", path.display()))?
    };

    info!(
        "Loaded {} field description override(s)",
        overrides.values().map(BTreeMap::len).sum::<usize>()
    );
    Ok(overrides)
}
