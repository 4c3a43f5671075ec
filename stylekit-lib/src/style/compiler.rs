//! Turns a [`Descriptor`] into a list of [`Rule`]s.
//!
//! Only the top level is compiled eagerly. Nested blocks stay inside their
//! `Rule::Nested`/`Rule::Wrapper` and are run back through
//! [`compile_scope`] by the renderer.

use log::{debug, trace};

use crate::error::{CompileError, Result};
use crate::style::descriptor::Descriptor;
use crate::style::rule::{Body, Declaration, Rule};
use crate::style::value::{kebab_case, Value};

/// How many levels of nested blocks are followed before giving up.
pub const MAX_DEPTH: usize = 64;

/// At-rules that group ordinary style rules and therefore keep the
/// enclosing selector when nested inside one.
const GROUPING_AT_RULES: &[&str] = &[
    "@media",
    "@supports",
    "@container",
    "@layer",
    "@document",
    "@scope",
    "@starting-style",
];

/// Error context used for keys at the top level of a descriptor.
const TOP_LEVEL: &str = "(top level)";

/// Compiles a descriptor or a bare selector string.
///
/// Any other shape fails with [`CompileError::InvalidDescriptor`].
pub fn compile(input: &Value) -> Result<Vec<Rule<'_>>> {
    match input {
        Value::Block(descriptor) => compile_descriptor(descriptor),
        Value::Str(selector) => compile_selector(selector),
        other => Err(CompileError::invalid_descriptor(other.kind())),
    }
}

/// Same as `compile(&Value::Block(..))` without the clone.
pub fn compile_descriptor(descriptor: &Descriptor) -> Result<Vec<Rule<'_>>> {
    validate(descriptor, None, TOP_LEVEL, 0)?;
    let rules = compile_entries(descriptor)?;
    debug!("compiled descriptor with {} top-level rules", rules.len());
    Ok(rules)
}

/// A bare selector, equivalent to `{ selector: null }`.
pub fn compile_selector(selector: &str) -> Result<Vec<Rule<'static>>> {
    let rule = if is_at_rule(selector) {
        Rule::Wrapper {
            at_rule: selector.trim().to_string(),
            body: Body::Empty,
            scope: None,
        }
    } else {
        Rule::Nested {
            selector: selector.trim().to_string(),
            body: Body::Empty,
        }
    };
    Ok(vec![rule])
}

/// One rule per top-level entry: a wrapper for at-rules, a nested rule for
/// everything else.
pub(crate) fn compile_entries(descriptor: &Descriptor) -> Result<Vec<Rule<'_>>> {
    descriptor
        .iter()
        .map(|(key, value)| {
            let body = body_of(TOP_LEVEL, key, value)?;
            let rule = if is_at_rule(key) {
                Rule::Wrapper {
                    at_rule: key.trim().to_string(),
                    body,
                    scope: None,
                }
            } else {
                Rule::Nested {
                    selector: key.trim().to_string(),
                    body,
                }
            };
            Ok(rule)
        })
        .collect()
}

/// Compiles the block of `selector`.
///
/// The first rule is always the `Rule::Simple` holding the block's direct
/// declarations, possibly none. Nested selectors and at-rules follow in
/// source order.
pub fn compile_scope<'a>(selector: &str, descriptor: &'a Descriptor) -> Result<Vec<Rule<'a>>> {
    let mut declarations = Vec::new();
    let mut children = Vec::new();

    for (key, value) in descriptor.iter() {
        if is_at_rule(key) {
            let at_rule = key.trim().to_string();
            let scope = is_grouping_at_rule(&at_rule).then(|| selector.to_string());
            children.push(Rule::Wrapper {
                body: body_of(selector, key, value)?,
                at_rule,
                scope,
            });
            continue;
        }

        match value {
            Value::Block(inner) => children.push(Rule::Nested {
                selector: nest_selector(selector, key.trim()),
                body: Body::Block(inner),
            }),
            Value::Null => debug!("skipping null entry '{}' in '{}'", key, selector),
            other => match other.to_value() {
                Some(text) => declarations.push(Declaration::new(kebab_case(key.trim()), text)),
                None => return Err(CompileError::invalid_value(selector, key, other.kind())),
            },
        }
    }

    trace!(
        "scope '{}': {} declarations, {} nested rules",
        selector,
        declarations.len(),
        children.len()
    );

    let mut rules = Vec::with_capacity(children.len() + 1);
    rules.push(Rule::Simple {
        selector: selector.to_string(),
        declarations,
    });
    rules.extend(children);
    Ok(rules)
}

/// True if `key` starts with `@` once leading whitespace is ignored.
pub fn is_at_rule(key: &str) -> bool {
    key.trim_start().starts_with('@')
}

fn is_grouping_at_rule(at_rule: &str) -> bool {
    let name = at_rule
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    GROUPING_AT_RULES
        .iter()
        .any(|grouping| name.eq_ignore_ascii_case(grouping))
}

/// Resolves a nested key against its parent selector.
///
/// Every `&` is replaced with `parent`; without one the key becomes a
/// descendant of `parent`.
pub fn nest_selector(parent: &str, key: &str) -> String {
    if key.contains('&') {
        key.replace('&', parent)
    } else {
        format!("{} {}", parent, key)
    }
}

fn body_of<'a>(selector: &str, key: &str, value: &'a Value) -> Result<Body<'a>> {
    match value {
        Value::Block(descriptor) => Ok(Body::Block(descriptor)),
        Value::Null => Ok(Body::Empty),
        other => other
            .to_value()
            .map(Body::Value)
            .ok_or_else(|| CompileError::invalid_value(selector, key, other.kind())),
    }
}

/// Walks the whole tree once so that `compile` fails before any rendering
/// starts.
///
/// `scope` follows the selector `compile_scope` would be running under, or
/// `None` where entries compile as top-level rules. `context` names the
/// location in error messages.
fn validate(
    descriptor: &Descriptor,
    scope: Option<&str>,
    context: &str,
    depth: usize,
) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(CompileError::too_deep(context, MAX_DEPTH));
    }
    for (key, value) in descriptor.iter() {
        match value {
            Value::Block(inner) => {
                let key = key.trim();
                if is_at_rule(key) {
                    match scope.filter(|_| is_grouping_at_rule(key)) {
                        Some(selector) => validate(inner, Some(selector), selector, depth + 1)?,
                        None => validate(inner, None, key, depth + 1)?,
                    }
                } else {
                    let selector = match scope {
                        Some(parent) => nest_selector(parent, key),
                        None => key.to_string(),
                    };
                    validate(inner, Some(&selector), &selector, depth + 1)?;
                }
            }
            Value::Null => {}
            other if other.to_value().is_none() => {
                return Err(CompileError::invalid_value(context, key, other.kind()));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(json: serde_json::Value) -> Descriptor {
        Descriptor::try_from(json).unwrap()
    }

    #[test]
    fn test_top_level_dispatch() {
        let d = descriptor(json!({
            "@charset \"utf-8\"": null,
            ".a": { "color": "red" },
            "  @media print": { "body": { "margin": 0 } },
        }));
        let rules = compile_descriptor(&d).unwrap();
        assert_eq!(rules.len(), 3);
        assert!(matches!(&rules[0], Rule::Wrapper { body: Body::Empty, .. }));
        assert!(matches!(&rules[1], Rule::Nested { selector, body: Body::Block(_) } if selector == ".a"));
        assert_eq!(rules[2].selector(), "@media print");
    }

    #[test]
    fn test_bare_selector_string() {
        let input = Value::from(" html ");
        let rules = compile(&input).unwrap();
        assert_eq!(
            rules,
            vec![Rule::Nested {
                selector: "html".to_string(),
                body: Body::Empty,
            }]
        );
    }

    #[test]
    fn test_invalid_top_level_input() {
        assert_eq!(
            compile(&Value::Number(3.0)),
            Err(CompileError::invalid_descriptor("number"))
        );
        assert_eq!(
            compile(&Value::List(vec![])),
            Err(CompileError::invalid_descriptor("list"))
        );
    }

    #[test]
    fn test_scope_collects_declarations_first() {
        let d = descriptor(json!({
            "&:hover": { "color": "blue" },
            "backgroundColor": "red",
            "span": { "margin": 0 },
            "padding": [1, "2px"],
        }));
        let rules = compile_scope(".a", &d).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(
            rules[0],
            Rule::Simple {
                selector: ".a".to_string(),
                declarations: vec![
                    Declaration::new("background-color", "red"),
                    Declaration::new("padding", "1 2px"),
                ],
            }
        );
        assert_eq!(rules[1].selector(), ".a:hover");
        assert_eq!(rules[2].selector(), ".a span");
    }

    #[test]
    fn test_nest_selector() {
        assert_eq!(nest_selector(".a", "&:hover"), ".a:hover");
        assert_eq!(nest_selector(".a", "& + &"), ".a + .a");
        assert_eq!(nest_selector(".a", ".b &"), ".b .a");
        assert_eq!(nest_selector(".a", "span"), ".a span");
    }

    #[test]
    fn test_grouping_at_rules_keep_scope() {
        let d = descriptor(json!({
            "@media (max-width: 600px)": { "color": "red" },
            "@font-face": { "fontFamily": "X" },
        }));
        let rules = compile_scope(".a", &d).unwrap();
        assert!(matches!(&rules[1], Rule::Wrapper { scope: Some(s), .. } if s == ".a"));
        assert!(matches!(&rules[2], Rule::Wrapper { scope: None, .. }));
    }

    #[test]
    fn test_null_inside_scope_is_skipped() {
        let d = descriptor(json!({ "color": null, "margin": 0 }));
        let rules = compile_scope("p", &d).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(matches!(&rules[0], Rule::Simple { declarations, .. } if declarations.len() == 1));
    }

    #[test]
    fn test_boolean_is_rejected_with_context() {
        let d = descriptor(json!({ ".a": { "span": { "hidden": true } } }));
        assert_eq!(
            compile_descriptor(&d),
            Err(CompileError::invalid_value(".a span", "hidden", "boolean"))
        );
    }

    #[test]
    fn test_top_level_boolean_is_rejected() {
        let d = descriptor(json!({ "body": false }));
        assert_eq!(
            compile_descriptor(&d),
            Err(CompileError::invalid_value(TOP_LEVEL, "body", "boolean"))
        );
    }

    #[test]
    fn test_error_names_selector_under_grouping_at_rule() {
        let d = descriptor(json!({ ".a": { "@media print": { "span": { "hidden": true } } } }));
        assert_eq!(
            compile_descriptor(&d),
            Err(CompileError::invalid_value(".a span", "hidden", "boolean"))
        );

        let d = descriptor(json!({ ".a": { "@supports (gap: 1px)": { "gap": false } } }));
        assert_eq!(
            compile_descriptor(&d),
            Err(CompileError::invalid_value(".a", "gap", "boolean"))
        );
    }

    #[test]
    fn test_error_names_non_grouping_at_rule() {
        let d = descriptor(json!({ ".a": { "@font-face": { "fontDisplay": true } } }));
        assert_eq!(
            compile_descriptor(&d),
            Err(CompileError::invalid_value("@font-face", "fontDisplay", "boolean"))
        );
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        let d = Descriptor::new().with(
            "p",
            Descriptor::new().with("width", f64::INFINITY).with("height", f64::NAN),
        );
        assert_eq!(
            compile_descriptor(&d),
            Err(CompileError::invalid_value("p", "width", "number"))
        );
    }

    #[test]
    fn test_property_keys_are_trimmed() {
        let d = descriptor(json!({ "  color ": "red", " backgroundColor": "blue" }));
        let rules = compile_scope("p", &d).unwrap();
        assert_eq!(
            rules[0],
            Rule::Simple {
                selector: "p".to_string(),
                declarations: vec![
                    Declaration::new("color", "red"),
                    Declaration::new("background-color", "blue"),
                ],
            }
        );
    }

    #[test]
    fn test_nested_rules_borrow_their_block() {
        let d = descriptor(json!({ ".a": { "color": "red" } }));
        let rules = compile_descriptor(&d).unwrap();
        match &rules[0] {
            Rule::Nested { body: Body::Block(block), .. } => {
                assert!(std::ptr::eq(*block, d.get(".a").and_then(Value::as_block).unwrap()));
            }
            other => panic!("unexpected rule {:?}", other),
        }
    }

    #[test]
    fn test_depth_guard() {
        let mut d = Descriptor::new().with("color", "red");
        for _ in 0..(MAX_DEPTH + 1) {
            d = Descriptor::new().with("div", d);
        }
        assert!(matches!(
            compile_descriptor(&d),
            Err(CompileError::TooDeep { limit: MAX_DEPTH, .. })
        ));

        let mut shallow = Descriptor::new().with("color", "red");
        for _ in 0..8 {
            shallow = Descriptor::new().with("div", shallow);
        }
        assert!(compile_descriptor(&shallow).is_ok());
    }
}
