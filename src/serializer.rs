//! Serialization of endpoint records to YAML or JSON.
//!
//! Records are written in the order the analyzer produced them, so two runs over an
//! unchanged project give byte-identical output.

use crate::endpoint::EndpointRecord;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes endpoint records to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(records: &[EndpointRecord]) -> Result<String> {
    debug!("Serializing {} endpoint records to YAML", records.len());
    serde_yaml::to_string(records).context("Failed to serialize endpoint records to YAML")
}

/// Serializes endpoint records to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(records: &[EndpointRecord]) -> Result<String> {
    debug!("Serializing {} endpoint records to JSON", records.len());
    serde_json::to_string_pretty(records).context("Failed to serialize endpoint records to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// An existing file is overwritten.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointBuilder;
    use crate::route::{CombinedRoute, HttpMethod};
    use crate::schema_generator::Schema;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn records() -> Vec<EndpointRecord> {
        EndpointBuilder::new()
            .cat("Orders")
            .handler_simple_name("create_order")
            .description_lines(vec!["Places an order".to_string()])
            .route(CombinedRoute {
                combined_urls: vec!["/orders".to_string(), "/orders/new".to_string()],
                combined_verbs: vec![HttpMethod::Post],
            })
            .request_body_json_schema(Some(Schema::of_type("object")))
            .author("Dana")
            .source_code("async fn create_order() {}")
            .build()
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&records()).unwrap();

        assert!(yaml.contains("cat: Orders"));
        assert!(yaml.contains("handlerSimpleName: create_order"));
        assert!(yaml.contains("url: /orders/new"));
        assert!(yaml.contains("httpMethod: post"));
        assert!(yaml.contains("isDeprecated: false"));
        assert!(yaml.contains("- Places an order"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&records()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["url"], "/orders");
        assert_eq!(entries[1]["url"], "/orders/new");
        assert_eq!(entries[0]["author"], "Dana");
        assert_eq!(entries[0]["requestBodyJsonSchema"]["type"], "object");
        assert!(entries[0]["responseBodyJsonSchema"].is_null());

        // pretty-printed
        assert!(json.lines().count() > 5);
    }

    #[test]
    fn test_serialize_empty_list() {
        assert_eq!(serialize_json(&[]).unwrap(), "[]");
        assert_eq!(serialize_yaml(&[]).unwrap().trim(), "[]");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("docs").join("nested").join("endpoints.yaml");

        write_to_file("first", &file_path).unwrap();
        write_to_file("second", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "second");
    }
}
