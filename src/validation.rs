//! Validation rule discovery.
//!
//! Rules come from `#[validate(...)]` (validator crate) and `#[garde(...)]` (garde
//! crate) attributes, looked up through `cfg_attr`. Rules nested in `inner(...)` apply
//! to the single element type of a container field and are reported with the
//! [`INNER_ELEMENT_PREFIX`] on their label.

use crate::attrs::{expr_str, meta_name, merged_metas, nested_metas};
use quote::ToTokens;
use serde::Serialize;
use syn::{Attribute, Meta};

pub const INNER_ELEMENT_PREFIX: &str = "inner element ";

/// Attribute names holding validation rules.
const RULE_ATTRIBUTES: &[&str] = &["validate", "garde"];

/// Rule arguments that never end up in a note.
const SILENT_ARGUMENTS: &[&str] = &["message", "code"];

/// One validation constraint, as written into property descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorDescriptor {
    /// Human-readable constraint kind, e.g. `length` or `inner element email`
    pub validator_type: String,
    pub note: String,
}

impl ValidatorDescriptor {
    pub fn new(validator_type: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            validator_type: validator_type.into(),
            note: note.into(),
        }
    }
}

/// What an [`AnnotatedElement`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementTarget {
    /// The field or method itself
    Member,
    /// The single type argument of a container field
    TypeArgument,
}

/// A member (or the element type of a container member) inspected for constraints.
pub struct AnnotatedElement<'a> {
    /// Name of the field or method
    pub name: &'a str,
    pub target: ElementTarget,
    /// Attributes of the member; empty for a type argument, which cannot carry any
    pub attrs: &'a [Attribute],
    /// Constraint rules that apply to this element
    pub rules: Vec<Meta>,
}

/// Hook for project-specific validation conventions.
pub trait CustomValidationStrategy {
    /// Descriptors for constraints the built-in discovery does not know about.
    fn analyze_custom_validation(&self, element: &AnnotatedElement<'_>) -> Vec<ValidatorDescriptor>;
}

/// Strategy used when none is configured: finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidationStrategy;

impl CustomValidationStrategy for NoopValidationStrategy {
    fn analyze_custom_validation(&self, _element: &AnnotatedElement<'_>) -> Vec<ValidatorDescriptor> {
        Vec::new()
    }
}

/// Rules applying to the member itself.
pub fn member_rules(attrs: &[Attribute]) -> Vec<Meta> {
    rule_metas(attrs)
        .into_iter()
        .filter(|rule| meta_name(rule).as_deref() != Some("inner"))
        .collect()
}

/// Rules applying to the element type, from `inner(...)`.
pub fn inner_rules(attrs: &[Attribute]) -> Vec<Meta> {
    rule_metas(attrs)
        .iter()
        .filter(|rule| meta_name(rule).as_deref() == Some("inner"))
        .flat_map(nested_metas)
        .collect()
}

fn rule_metas(attrs: &[Attribute]) -> Vec<Meta> {
    merged_metas(attrs)
        .iter()
        .filter(|meta| {
            meta_name(meta)
                .as_deref()
                .is_some_and(|name| RULE_ATTRIBUTES.contains(&name))
        })
        .flat_map(nested_metas)
        .collect()
}

/// Custom strategy results followed by the built-in rules.
pub fn discover(
    strategy: &dyn CustomValidationStrategy,
    element: &AnnotatedElement<'_>,
) -> Vec<ValidatorDescriptor> {
    let mut valids = strategy.analyze_custom_validation(element);
    valids.extend(element.rules.iter().filter_map(describe_rule));
    valids
}

/// Validators of a member's own rules.
pub fn discover_member(
    strategy: &dyn CustomValidationStrategy,
    name: &str,
    attrs: &[Attribute],
) -> Vec<ValidatorDescriptor> {
    let element = AnnotatedElement {
        name,
        target: ElementTarget::Member,
        attrs,
        rules: member_rules(attrs),
    };
    discover(strategy, &element)
}

/// Validators of a container member's element type, labels prefixed.
pub fn discover_inner(
    strategy: &dyn CustomValidationStrategy,
    name: &str,
    attrs: &[Attribute],
) -> Vec<ValidatorDescriptor> {
    let element = AnnotatedElement {
        name,
        target: ElementTarget::TypeArgument,
        attrs: &[],
        rules: inner_rules(attrs),
    };
    discover(strategy, &element)
        .into_iter()
        .map(|mut valid| {
            valid.validator_type.insert_str(0, INNER_ELEMENT_PREFIX);
            valid
        })
        .collect()
}

fn describe_rule(rule: &Meta) -> Option<ValidatorDescriptor> {
    let name = meta_name(rule)?;
    let validator_type = match name.as_str() {
        "skip" | "schema" => return None,
        "dive" => "nested".to_string(),
        other => other.replace('_', " "),
    };

    let args = nested_metas(rule);
    let message = args
        .iter()
        .find(|arg| arg.path().is_ident("message"))
        .and_then(|arg| match arg {
            Meta::NameValue(nv) => expr_str(&nv.value),
            _ => None,
        });

    let note = match message {
        Some(message) => message,
        None => args
            .iter()
            .filter(|arg| {
                meta_name(arg)
                    .as_deref()
                    .map_or(true, |n| !SILENT_ARGUMENTS.contains(&n))
            })
            .map(render_argument)
            .collect::<Vec<_>>()
            .join(", "),
    };

    Some(ValidatorDescriptor {
        validator_type,
        note,
    })
}

fn render_argument(arg: &Meta) -> String {
    match arg {
        Meta::NameValue(nv) => {
            let value = expr_str(&nv.value)
                .unwrap_or_else(|| nv.value.to_token_stream().to_string());
            format!("{}={}", nv.path.to_token_stream(), value)
        }
        Meta::Path(path) => path.to_token_stream().to_string(),
        Meta::List(list) => list.to_token_stream().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field_attrs(code: &str) -> Vec<Attribute> {
        let item: syn::ItemStruct = syn::parse_str(code).unwrap();
        match item.fields {
            syn::Fields::Named(named) => named.named[0].attrs.clone(),
            _ => panic!("expected named fields"),
        }
    }

    struct TagStrategy;

    impl CustomValidationStrategy for TagStrategy {
        fn analyze_custom_validation(
            &self,
            element: &AnnotatedElement<'_>,
        ) -> Vec<ValidatorDescriptor> {
            if element.attrs.iter().any(|a| a.path().is_ident("tag")) {
                vec![ValidatorDescriptor::new("tag", element.name)]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_validator_rules() {
        let attrs = field_attrs(
            r#"struct A {
                #[validate(email, length(min = 3, max = 64))]
                #[validate(range(min = 1, message = "must be positive"))]
                email: String
            }"#,
        );
        let valids = discover_member(&NoopValidationStrategy, "email", &attrs);
        assert_eq!(
            valids,
            vec![
                ValidatorDescriptor::new("email", ""),
                ValidatorDescriptor::new("length", "min=3, max=64"),
                ValidatorDescriptor::new("range", "must be positive"),
            ]
        );
    }

    #[test]
    fn test_garde_rules_and_skip() {
        let attrs = field_attrs(
            r#"struct A { #[garde(ascii, must_match(other), dive)] #[garde(skip)] name: String }"#,
        );
        let labels: Vec<_> = discover_member(&NoopValidationStrategy, "name", &attrs)
            .into_iter()
            .map(|v| (v.validator_type, v.note))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("ascii".to_string(), String::new()),
                ("must match".to_string(), "other".to_string()),
                ("nested".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_inner_rules_are_separate() {
        let attrs = field_attrs(
            r#"struct A { #[garde(length(max = 5), inner(email))] tags: Vec<String> }"#,
        );

        let own = discover_member(&NoopValidationStrategy, "tags", &attrs);
        assert_eq!(own, vec![ValidatorDescriptor::new("length", "max=5")]);

        let inner = discover_inner(&NoopValidationStrategy, "tags", &attrs);
        assert_eq!(inner, vec![ValidatorDescriptor::new("inner element email", "")]);
    }

    #[test]
    fn test_custom_strategy_runs_first() {
        let attrs = field_attrs(r#"struct A { #[tag] #[validate(url)] home: String }"#);
        let valids = discover_member(&TagStrategy, "home", &attrs);
        assert_eq!(
            valids,
            vec![
                ValidatorDescriptor::new("tag", "home"),
                ValidatorDescriptor::new("url", ""),
            ]
        );
    }

    #[test]
    fn test_member_strategy_result_stays_on_member() {
        let attrs = field_attrs(
            r#"struct A { #[tag] #[garde(inner(email))] tags: Vec<String> }"#,
        );

        let own = discover_member(&TagStrategy, "tags", &attrs);
        assert_eq!(own, vec![ValidatorDescriptor::new("tag", "tags")]);

        let inner = discover_inner(&TagStrategy, "tags", &attrs);
        assert_eq!(inner, vec![ValidatorDescriptor::new("inner element email", "")]);
    }

    struct ElementRuleStrategy;

    impl CustomValidationStrategy for ElementRuleStrategy {
        fn analyze_custom_validation(
            &self,
            element: &AnnotatedElement<'_>,
        ) -> Vec<ValidatorDescriptor> {
            match element.target {
                ElementTarget::TypeArgument => element
                    .rules
                    .iter()
                    .filter(|rule| rule.path().is_ident("email"))
                    .map(|_| ValidatorDescriptor::new("company email", ""))
                    .collect(),
                ElementTarget::Member => Vec::new(),
            }
        }
    }

    #[test]
    fn test_strategy_sees_type_argument_rules() {
        let attrs = field_attrs(r#"struct A { #[garde(inner(email))] tags: Vec<String> }"#);
        let inner = discover_inner(&ElementRuleStrategy, "tags", &attrs);
        assert_eq!(
            inner,
            vec![
                ValidatorDescriptor::new("inner element company email", ""),
                ValidatorDescriptor::new("inner element email", ""),
            ]
        );
    }

    #[test]
    fn test_rules_inside_cfg_attr() {
        let attrs = field_attrs(
            r#"struct A { #[cfg_attr(feature = "checks", validate(credit_card))] card: String }"#,
        );
        let valids = discover_member(&NoopValidationStrategy, "card", &attrs);
        assert_eq!(valids, vec![ValidatorDescriptor::new("credit card", "")]);
    }
}
