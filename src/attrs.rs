//! Attribute helpers shared by the forest builder and the schema engine.
//!
//! Attributes are always read through [`merged_metas`], which expands
//! `#[cfg_attr(predicate, attr, ...)]` wrappers so that an attribute applied
//! conditionally is found the same way as one written directly.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use log::debug;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Lit, Meta, Token};

/// Expands every attribute into its metas, looking through `cfg_attr`.
pub fn merged_metas(attrs: &[Attribute]) -> Vec<Meta> {
    let mut metas = Vec::new();
    for attr in attrs {
        push_expanded(&attr.meta, &mut metas);
    }
    metas
}

fn push_expanded(meta: &Meta, out: &mut Vec<Meta>) {
    if meta.path().is_ident("cfg_attr") {
        // First nested meta is the predicate, the rest are the attributes it guards
        for inner in nested_metas(meta).iter().skip(1) {
            push_expanded(inner, out);
        }
    } else {
        out.push(meta.clone());
    }
}

/// Last path segment of a meta, so `actix_web::get` reads as `get`.
pub fn meta_name(meta: &Meta) -> Option<String> {
    meta.path().segments.last().map(|s| s.ident.to_string())
}

/// First merged attribute with the given name.
pub fn find_merged(attrs: &[Attribute], name: &str) -> Option<Meta> {
    merged_metas(attrs)
        .into_iter()
        .find(|meta| meta_name(meta).as_deref() == Some(name))
}

/// All merged attributes with the given name, in declaration order.
pub fn find_all_merged(attrs: &[Attribute], name: &str) -> Vec<Meta> {
    merged_metas(attrs)
        .into_iter()
        .filter(|meta| meta_name(meta).as_deref() == Some(name))
        .collect()
}

pub fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    find_merged(attrs, name).is_some()
}

/// Comma-separated metas inside a list attribute; empty for paths and name-values.
pub fn nested_metas(meta: &Meta) -> Vec<Meta> {
    match meta {
        Meta::List(list) => list
            .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
            .map(|nested| nested.into_iter().collect())
            .unwrap_or_else(|e| {
                debug!("Unparsable attribute arguments `{}`: {}", list.tokens, e);
                Vec::new()
            }),
        _ => Vec::new(),
    }
}

/// String value of `name = "value"`.
pub fn meta_str_value(meta: &Meta) -> Option<String> {
    if let Meta::NameValue(name_value) = meta {
        return expr_str(&name_value.value);
    }
    None
}

pub fn expr_str(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => Some(lit_str.value()),
            _ => None,
        },
        _ => None,
    }
}

/// Display format pattern from `#[display_format(pattern = "..")]` or `#[display_format("..")]`.
pub fn find_format_pattern(attrs: &[Attribute]) -> Option<String> {
    let meta = find_merged(attrs, "display_format")?;
    for nested in nested_metas(&meta) {
        if nested.path().is_ident("pattern") {
            if let Some(pattern) = meta_str_value(&nested) {
                return Some(pattern);
            }
        }
    }
    match &meta {
        Meta::List(list) => list.parse_args::<syn::LitStr>().ok().map(|s| s.value()),
        _ => None,
    }
}

/// Serde attributes for a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Extra names accepted on input
    pub aliases: Vec<String>,
    /// Whether to skip this field during serialization
    pub skip: bool,
    /// Whether to flatten this field
    pub flatten: bool,
    /// Whether a missing value falls back to a default
    pub default: bool,
    /// Custom serializer from `with` or `serialize_with`
    pub serialize_with: Option<String>,
}

/// Parse Serde attributes from field or variant attributes
pub fn parse_serde_attributes(attrs: &[Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for meta in find_all_merged(attrs, "serde") {
        for nested in nested_metas(&meta) {
            let Some(name) = meta_name(&nested) else {
                continue;
            };
            match name.as_str() {
                "rename" => {
                    serde_attrs.rename = meta_str_value(&nested).or_else(|| {
                        nested_metas(&nested)
                            .iter()
                            .find(|m| m.path().is_ident("serialize"))
                            .and_then(meta_str_value)
                    });
                }
                "alias" => serde_attrs.aliases.extend(meta_str_value(&nested)),
                "skip" | "skip_serializing" => serde_attrs.skip = true,
                "flatten" => serde_attrs.flatten = true,
                "default" => serde_attrs.default = true,
                "with" | "serialize_with" => serde_attrs.serialize_with = meta_str_value(&nested),
                _ => {}
            }
        }
    }

    serde_attrs
}

/// `rename_all` rule of a struct or enum.
pub fn parse_rename_all(attrs: &[Attribute]) -> Option<String> {
    for meta in find_all_merged(attrs, "serde") {
        for nested in nested_metas(&meta) {
            if nested.path().is_ident("rename_all") {
                let rule = meta_str_value(&nested).or_else(|| {
                    nested_metas(&nested)
                        .iter()
                        .find(|m| m.path().is_ident("serialize"))
                        .and_then(meta_str_value)
                });
                if rule.is_some() {
                    return rule;
                }
            }
        }
    }
    None
}

/// Applies a serde `rename_all` rule to a field or variant name.
pub fn apply_rename_rule(rule: &str, name: &str) -> String {
    match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "PascalCase" => name.to_upper_camel_case(),
        "camelCase" => name.to_lower_camel_case(),
        "snake_case" => name.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => name.to_shouty_snake_case(),
        "kebab-case" => name.to_kebab_case(),
        "SCREAMING-KEBAB-CASE" => name.to_shouty_kebab_case(),
        _ => name.to_string(),
    }
}
