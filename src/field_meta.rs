use crate::comments::description_section;
use crate::config::FieldOverrides;
use crate::error::{Error, Result};
use crate::forest::{DeclarationForest, TypeKind};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Description lines starting with this marker hide a field from the documentation.
pub const DOC_IGNORE_MARKER: &str = "doc-ignore";

/// Key of the field table: owning type qualifier and a name the field binds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub type_qualifier: String,
    pub field_name: String,
}

impl FieldKey {
    pub fn new(type_qualifier: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_qualifier: type_qualifier.into(),
            field_name: field_name.into(),
        }
    }
}

/// Description of one field and whether it is hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub description_lines: Vec<String>,
    pub doc_ignore: bool,
}

/// Field description table, complete before any schema is generated.
#[derive(Debug, Default)]
pub struct FieldMetadataTable {
    entries: HashMap<FieldKey, FieldDescription>,
}

impl FieldMetadataTable {
    pub fn get(&self, type_qualifier: &str, field_name: &str) -> Option<&FieldDescription> {
        self.entries.get(&FieldKey::new(type_qualifier, field_name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Field metadata collector - first phase of a documentation run
pub struct FieldMetadataCollector;

impl FieldMetadataCollector {
    /// Collect a description entry for every name bound by a named field of every
    /// struct, trait and union in the forest.
    ///
    /// # Arguments
    ///
    /// * `forest` - The declaration forest of the project
    /// * `overrides` - Optional table whose descriptions win over doc comments
    ///
    /// # Errors
    ///
    /// Returns [`Error::QualifierAbsent`] for a type whose fully-qualified name cannot
    /// be determined; no partial table is returned.
    pub fn collect(
        forest: &DeclarationForest,
        overrides: Option<&FieldOverrides>,
    ) -> Result<FieldMetadataTable> {
        let mut table = FieldMetadataTable::default();

        for type_decl in forest.types() {
            if type_decl.kind == TypeKind::Enum {
                continue;
            }

            let qualifier = type_decl
                .qualifier
                .as_ref()
                .ok_or_else(|| Error::QualifierAbsent {
                    type_name: type_decl.name.clone(),
                    file: forest.file(type_decl.file).path.clone(),
                })?;
            // Same rule as the forest's type index: the first declaration owns the qualifier
            if forest.type_by_qualifier(qualifier).map(|t| t.node) != Some(type_decl.node) {
                debug!("Skipping fields of shadowed declaration {}", qualifier);
                continue;
            }
            let type_overrides = overrides.and_then(|o| o.get(qualifier));

            for field in &type_decl.fields {
                let doc_description = description_section(&forest.node(field.node).doc_lines);
                let doc_ignore = has_doc_ignore_marker(&doc_description);

                for name in &field.bound_names {
                    let description_lines = match type_overrides.and_then(|o| o.get(name)) {
                        Some(text) => vec![text.clone()],
                        None => doc_description.clone(),
                    };
                    table.entries.insert(
                        FieldKey::new(qualifier.clone(), name.clone()),
                        FieldDescription {
                            description_lines,
                            doc_ignore,
                        },
                    );
                }
            }
        }

        debug!("Collected {} field description entries", table.len());
        Ok(table)
    }
}

fn has_doc_ignore_marker(lines: &[String]) -> bool {
    lines.iter().any(|line| {
        line.get(..DOC_IGNORE_MARKER.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(DOC_IGNORE_MARKER))
    })
}
