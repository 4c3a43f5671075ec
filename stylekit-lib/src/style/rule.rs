use std::fmt;

use crate::style::descriptor::Descriptor;

/// One compiled rule. Nested and wrapper rules borrow their block from the
/// source descriptor and are expanded again each time they are rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule<'a> {
    /// A flat rule: `selector { prop: value; ... }`.
    Simple {
        selector: String,
        declarations: Vec<Declaration>,
    },
    /// One entry of a parent descriptor.
    Nested { selector: String, body: Body<'a> },
    /// An at-rule, either wrapping a block or standing alone as a statement.
    Wrapper {
        at_rule: String,
        body: Body<'a>,
        /// Selector the block is compiled under, for `@media` and friends
        /// nested inside a selector.
        scope: Option<String>,
    },
}

/// What follows a rule's selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<'a> {
    Block(&'a Descriptor),
    /// An already serialized property value.
    Value(String),
    Empty,
}

/// A single `property: value` pair, property already kebab-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl Rule<'_> {
    /// The selector or at-rule text heading this rule.
    pub fn selector(&self) -> &str {
        match self {
            Rule::Simple { selector, .. } | Rule::Nested { selector, .. } => selector,
            Rule::Wrapper { at_rule, .. } => at_rule,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}
