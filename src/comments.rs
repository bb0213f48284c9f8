//! Doc comment extraction and inheritance.
//!
//! A declaration without its own author or description inherits it from the nearest
//! enclosing declaration that can carry commentary: a field from its struct, a method
//! from the type its `impl` block belongs to, a type from its module, a module from
//! its file.

use crate::attrs::{merged_metas, meta_name, meta_str_value};
use crate::forest::{DeclarationForest, FileDecl, NodeId};
use heck::ToUpperCamelCase;
use log::debug;
use syn::Attribute;

pub const AUTHOR_TAG: &str = "@author";

/// Doc comment lines of an item, trimmed, in source order.
///
/// Reads `#[doc = ".."]` attributes, which is what `///`, `//!` and block doc comments
/// desugar to. Block comments are split on newlines and lose their leading `*`.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    let mut lines = Vec::new();
    for meta in merged_metas(attrs) {
        if meta_name(&meta).as_deref() != Some("doc") {
            continue;
        }
        let Some(text) = meta_str_value(&meta) else {
            continue;
        };
        if text.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        for line in text.lines() {
            let line = line.trim();
            let line = line.strip_prefix('*').map(str::trim).unwrap_or(line);
            lines.push(line.to_string());
        }
    }

    // Block comments open and close on their own lines
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Non-blank lines before the first block tag (a line starting with `@`).
pub fn description_section(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .take_while(|l| !l.starts_with('@'))
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Contents of every `tag` line, e.g. `Jane 2024-01-02` for `@author Jane 2024-01-02`.
pub fn tag_section(lines: &[String], tag: &str) -> Vec<String> {
    lines
        .iter()
        .filter_map(|l| {
            let rest = l.trim().strip_prefix(tag)?;
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return None;
            }
            let content = rest.trim();
            (!content.is_empty()).then(|| content.to_string())
        })
        .collect()
}

/// Deduplicates (first-seen order) and joins with newlines.
pub fn distinct_and_concat(values: Vec<String>) -> String {
    let mut distinct: Vec<String> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    distinct.join("\n")
}

/// Comment resolver - walks declaration ancestors to find inherited doc sections
pub struct CommentResolver<'a> {
    forest: &'a DeclarationForest,
}

impl<'a> CommentResolver<'a> {
    pub fn new(forest: &'a DeclarationForest) -> Self {
        Self { forest }
    }

    /// Author of a declaration, inherited from its ancestors when it has none.
    ///
    /// # Returns
    ///
    /// The distinct authors joined with `\n`, or an empty string when no declaration in
    /// the ancestor chain names one.
    pub fn resolve_author(&self, node: NodeId) -> String {
        distinct_and_concat(self.resolve_section(node, |lines| tag_section(lines, AUTHOR_TAG)))
    }

    /// Description lines of a declaration, inherited from its ancestors when it has none.
    pub fn resolve_description(&self, node: NodeId) -> Vec<String> {
        self.resolve_section(node, description_section)
    }

    /// Author of a whole file.
    ///
    /// A file whose stem names one of its top-level types (`user_controller.rs` and
    /// `UserController`) is authored by that type. Otherwise the authors of all
    /// top-level types are merged; a file without types falls back to its own
    /// inner doc comment.
    pub fn resolve_file_author(&self, file: &FileDecl) -> String {
        let primary_name = file
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_upper_camel_case());

        if let Some(primary) = file
            .top_level_types
            .iter()
            .find(|&&node| Some(&self.forest.node(node).name) == primary_name.as_ref())
        {
            return self.resolve_author(*primary);
        }

        if file.top_level_types.is_empty() {
            return self.resolve_author(file.node);
        }

        let authors = file
            .top_level_types
            .iter()
            .flat_map(|&node| self.resolve_section(node, |lines| tag_section(lines, AUTHOR_TAG)))
            .collect();
        distinct_and_concat(authors)
    }

    fn resolve_section<F>(&self, node: NodeId, extract: F) -> Vec<String>
    where
        F: Fn(&[String]) -> Vec<String>,
    {
        let mut current = Some(node);
        while let Some(id) = current {
            let decl = self.forest.node(id);
            if let Some(lines) = decl.commentary() {
                let section = extract(lines);
                if !section.is_empty() {
                    return section;
                }
            }
            current = decl.parent;
        }
        debug!("No doc section found from {}", self.forest.node(node).name);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tests::forest_from_files;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_doc_lines_from_line_and_block_comments() {
        let item: syn::ItemStruct = syn::parse_str(
            r#"
            /// First line
            ///
            /// Second paragraph
            /**
             * Block body
             * @author Jane
             */
            struct A;
            "#,
        )
        .unwrap();

        assert_eq!(
            doc_lines(&item.attrs),
            vec!["First line", "", "Second paragraph", "", "Block body", "@author Jane"]
        );
    }

    #[test]
    fn test_sections() {
        let lines: Vec<String> = ["Summary", "", "More", "@author Jane 2024", "Trailing", "@authors x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(description_section(&lines), vec!["Summary", "More"]);
        assert_eq!(tag_section(&lines, AUTHOR_TAG), vec!["Jane 2024"]);
    }

    #[test]
    fn test_distinct_and_concat() {
        assert_eq!(distinct_and_concat(vec![]), "");
        assert_eq!(distinct_and_concat(vec!["A".into()]), "A");
        assert_eq!(
            distinct_and_concat(vec!["A".into(), "B".into(), "A".into()]),
            "A\nB"
        );
    }

    #[test]
    fn test_author_inherited_from_enclosing_type() {
        let forest = forest_from_files(&[(
            "src/model.rs",
            r#"
            /// A user
            /// @author Jane
            pub struct User {
                /// The id
                pub id: u32,
            }

            impl User {
                /// Display name
                pub fn label(&self) -> String { String::new() }
            }
            "#,
        )]);
        let resolver = CommentResolver::new(&forest);
        let user = forest.type_by_qualifier("crate::model::User").unwrap();

        assert_eq!(resolver.resolve_author(user.fields[0].node), "Jane");
        assert_eq!(resolver.resolve_description(user.fields[0].node), vec!["The id"]);

        // Method -> impl block (no commentary) -> User
        let label = user.methods[0].node.unwrap();
        assert_eq!(resolver.resolve_author(label), "Jane");
    }

    #[test]
    fn test_undocumented_chain_yields_empty_author() {
        let forest = forest_from_files(&[(
            "src/model.rs",
            "pub struct Plain { pub id: u32 }",
        )]);
        let resolver = CommentResolver::new(&forest);
        let plain = forest.type_by_qualifier("crate::model::Plain").unwrap();

        assert_eq!(resolver.resolve_author(plain.fields[0].node), "");
        assert!(resolver.resolve_description(plain.node).is_empty());
    }

    #[test]
    fn test_file_author_prefers_primary_type() {
        let forest = forest_from_files(&[(
            "src/user_controller.rs",
            r#"
            /// @author Bob
            pub struct Helper;

            /// @author Alice
            pub struct UserController;
            "#,
        )]);
        let resolver = CommentResolver::new(&forest);
        assert_eq!(resolver.resolve_file_author(forest.file(0)), "Alice");
    }

    #[test]
    fn test_file_author_unions_top_level_types() {
        let forest = forest_from_files(&[(
            "src/models.rs",
            r#"
            /// @author A
            pub struct First;

            /// @author B
            pub struct Second;

            /// @author A
            pub struct Third;
            "#,
        )]);
        let resolver = CommentResolver::new(&forest);
        assert_eq!(resolver.resolve_file_author(forest.file(0)), "A\nB");
    }

    #[test]
    fn test_file_without_types_uses_inner_doc() {
        let forest = forest_from_files(&[(
            "src/handlers.rs",
            "//! Handlers\n//! @author Carol\n\npub fn helper() {}\n",
        )]);
        let resolver = CommentResolver::new(&forest);
        assert_eq!(resolver.resolve_file_author(forest.file(0)), "Carol");
    }
}
