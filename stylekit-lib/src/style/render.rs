use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CompileError, Result};
use crate::style::compiler::{compile_entries, compile_scope, MAX_DEPTH};
use crate::style::rule::{Body, Rule};
use crate::style::value::kebab_case;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Indented, one declaration per line.
    #[default]
    Expanded,
    /// Single line, no optional whitespace.
    Minified,
}

impl Mode {
    fn separator(self) -> &'static str {
        match self {
            Mode::Expanded => "\n",
            Mode::Minified => "",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Expanded => f.write_str("expanded"),
            Mode::Minified => f.write_str("minified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown render mode '{0}', expected 'expanded' or 'minified'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expanded" | "pretty" => Ok(Mode::Expanded),
            "minified" | "min" | "compressed" => Ok(Mode::Minified),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Knobs for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub mode: Mode,
    /// Spaces per nesting level in expanded mode.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            mode: Mode::Expanded,
            indent: 4,
        }
    }
}

impl RenderOptions {
    pub fn expanded() -> Self {
        RenderOptions::default()
    }

    pub fn minified() -> Self {
        RenderOptions::default().with_mode(Mode::Minified)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    fn is_minified(&self) -> bool {
        self.mode == Mode::Minified
    }

    fn pad(&self, depth: usize) -> String {
        if self.is_minified() {
            String::new()
        } else {
            " ".repeat(depth * self.indent)
        }
    }

    fn clean<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.is_minified() {
            collapse_whitespace(text)
        } else {
            Cow::Borrowed(text)
        }
    }
}

/// Renders compiled rules to CSS text.
///
/// Nested blocks are compiled again here, so this can fail the same way
/// `compile` does when handed hand-built rules.
pub fn render(rules: &[Rule], options: &RenderOptions) -> Result<String> {
    render_all(rules, 0, 0, options)
}

fn render_all(rules: &[Rule], depth: usize, nesting: usize, options: &RenderOptions) -> Result<String> {
    let mut parts = Vec::with_capacity(rules.len());
    for rule in rules {
        parts.push(render_rule(rule, depth, nesting, options)?);
    }
    Ok(parts.join(options.mode.separator()))
}

fn render_rule(rule: &Rule, depth: usize, nesting: usize, options: &RenderOptions) -> Result<String> {
    if nesting > MAX_DEPTH {
        return Err(CompileError::too_deep(rule.selector(), MAX_DEPTH));
    }
    let pad = options.pad(depth);

    match rule {
        Rule::Simple {
            selector,
            declarations,
        } => {
            let selector = options.clean(selector);
            if declarations.is_empty() {
                return Ok(if options.is_minified() {
                    String::new()
                } else {
                    format!("{}/* {} {{}} */", pad, selector)
                });
            }
            if options.is_minified() {
                let body: String = declarations
                    .iter()
                    .map(|d| format!("{}:{};", options.clean(&d.property), options.clean(&d.value)))
                    .collect();
                Ok(format!("{}{{{}}}", selector, body))
            } else {
                let inner_pad = options.pad(depth + 1);
                let body = declarations
                    .iter()
                    .map(|d| format!("{}{}", inner_pad, d))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(format!("{}{} {{\n{}\n{}}}", pad, selector, body, pad))
            }
        }
        Rule::Nested { selector, body } => match body {
            Body::Block(descriptor) => {
                let rules = compile_scope(selector, descriptor)?;
                render_all(&rules, depth, nesting + 1, options)
            }
            Body::Value(value) => Ok(declaration_line(&pad, &kebab_case(selector), value, options)),
            Body::Empty => Ok(format!("{}{}", pad, options.clean(selector))),
        },
        Rule::Wrapper {
            at_rule,
            body,
            scope,
        } => {
            let at_rule = options.clean(at_rule);
            match body {
                Body::Block(descriptor) => {
                    let rules = match scope {
                        Some(selector) => compile_scope(selector, descriptor)?,
                        None => compile_entries(descriptor)?,
                    };
                    let inner = render_all(&rules, depth + 1, nesting + 1, options)?;
                    if options.is_minified() {
                        Ok(format!("{}{{{}}}", at_rule, inner))
                    } else if inner.is_empty() {
                        Ok(format!("{}{} {{\n{}}}", pad, at_rule, pad))
                    } else {
                        Ok(format!("{}{} {{\n{}\n{}}}", pad, at_rule, inner, pad))
                    }
                }
                Body::Value(value) => Ok(format!("{}{} {};", pad, at_rule, options.clean(value))),
                Body::Empty => Ok(format!("{}{};", pad, at_rule)),
            }
        }
    }
}

fn declaration_line(pad: &str, property: &str, value: &str, options: &RenderOptions) -> String {
    if options.is_minified() {
        format!("{}:{};", options.clean(property), options.clean(value))
    } else {
        format!("{}{}: {};", pad, property, value)
    }
}

/// Trims `text` and squeezes whitespace runs outside quoted strings to a
/// single space. A backslash escapes the character after it.
fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim();
    let mut previous_space = false;
    let needs_work = trimmed.chars().any(|ch| {
        let odd = ch.is_whitespace() && (ch != ' ' || previous_space);
        previous_space = ch.is_whitespace();
        odd
    });
    if !needs_work {
        return Cow::Borrowed(trimmed);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;
    for ch in trimmed.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => {
                out.push(ch);
                if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None if ch.is_whitespace() => pending_space = true,
            None => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                match ch {
                    '"' | '\'' => quote = Some(ch),
                    '\\' => escaped = true,
                    _ => {}
                }
                out.push(ch);
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::rule::Declaration;

    fn simple<'a>(selector: &str, declarations: &[(&str, &str)]) -> Rule<'a> {
        Rule::Simple {
            selector: selector.to_string(),
            declarations: declarations
                .iter()
                .map(|(p, v)| Declaration::new(*p, *v))
                .collect(),
        }
    }

    #[test]
    fn test_simple_rule_modes() {
        let rules = vec![simple("p", &[("color", "red"), ("margin", "0")])];
        assert_eq!(
            render(&rules, &RenderOptions::expanded()).unwrap(),
            "p {\n    color: red;\n    margin: 0;\n}"
        );
        assert_eq!(
            render(&rules, &RenderOptions::minified()).unwrap(),
            "p{color:red;margin:0;}"
        );
    }

    #[test]
    fn test_custom_indent() {
        let rules = vec![simple("p", &[("color", "red")])];
        let options = RenderOptions::default().with_indent(2);
        assert_eq!(render(&rules, &options).unwrap(), "p {\n  color: red;\n}");
    }

    #[test]
    fn test_empty_rule_is_a_comment() {
        let rules = vec![simple(".empty", &[])];
        assert_eq!(
            render(&rules, &RenderOptions::expanded()).unwrap(),
            "/* .empty {} */"
        );
        assert_eq!(render(&rules, &RenderOptions::minified()).unwrap(), "");
    }

    #[test]
    fn test_wrapper_statements() {
        let rules = vec![
            Rule::Wrapper {
                at_rule: "@import url(a.css)".to_string(),
                body: Body::Empty,
                scope: None,
            },
            Rule::Wrapper {
                at_rule: "@layer".to_string(),
                body: Body::Value("base, theme".to_string()),
                scope: None,
            },
        ];
        assert_eq!(
            render(&rules, &RenderOptions::expanded()).unwrap(),
            "@import url(a.css);\n@layer base, theme;"
        );
    }

    #[test]
    fn test_nested_value_is_a_declaration() {
        let rules = vec![Rule::Nested {
            selector: "fontFamily".to_string(),
            body: Body::Value("serif".to_string()),
        }];
        assert_eq!(
            render(&rules, &RenderOptions::expanded()).unwrap(),
            "font-family: serif;"
        );
        assert_eq!(
            render(&rules, &RenderOptions::minified()).unwrap(),
            "font-family:serif;"
        );
    }

    #[test]
    fn test_minified_cleans_property_names() {
        let rules = vec![
            simple("p", &[(" color ", "red")]),
            Rule::Nested {
                selector: " fontFamily".to_string(),
                body: Body::Value("serif".to_string()),
            },
        ];
        assert_eq!(
            render(&rules, &RenderOptions::minified()).unwrap(),
            "p{color:red;}font-family:serif;"
        );
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Expanded".parse::<Mode>(), Ok(Mode::Expanded));
        assert_eq!(" min ".parse::<Mode>(), Ok(Mode::Minified));
        assert_eq!(
            "tiny".parse::<Mode>(),
            Err(UnknownMode("tiny".to_string()))
        );
        assert_eq!(Mode::Minified.to_string(), "minified");
    }

    #[test]
    fn test_options_from_json() {
        let options: RenderOptions =
            serde_json::from_value(serde_json::json!({ "mode": "minified" })).unwrap();
        assert_eq!(options, RenderOptions::minified());
        let options: RenderOptions =
            serde_json::from_value(serde_json::json!({ "indent": 2 })).unwrap();
        assert_eq!(options, RenderOptions::expanded().with_indent(2));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace(" .a   >  .b "), ".a > .b");
        assert_eq!(collapse_whitespace("a\n\tb"), "a b");
        assert_eq!(collapse_whitespace("\"x   y\"  z"), "\"x   y\" z");
        assert!(matches!(collapse_whitespace("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_collapse_unicode_whitespace_and_escapes() {
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a b");
        assert_eq!(collapse_whitespace("a\u{a0}b"), "a b");
        assert_eq!(
            collapse_whitespace("\"x\\\"  y\"   z"),
            "\"x\\\"  y\" z"
        );
        assert_eq!(collapse_whitespace(".a\\  b   c"), ".a\\  b c");
    }
}
