//! Errors raised while compiling a style descriptor.

/// Result type alias for compile and render operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Everything that can abort a `compile` or `render` call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The top-level input was neither a mapping nor a selector string.
    #[error("Invalid style descriptor: expected a mapping or a selector string, found {found}")]
    InvalidDescriptor { found: &'static str },

    /// A value could not be classified as a property value, at-rule or nested block.
    #[error("Invalid value for '{key}' in '{selector}': {found} is not a property value or a nested descriptor")]
    InvalidValue {
        selector: String,
        key: String,
        found: &'static str,
    },

    /// The descriptor nests deeper than the compiler is willing to follow.
    #[error("Style descriptor nested more than {limit} levels deep at '{selector}'")]
    TooDeep { selector: String, limit: usize },
}

impl CompileError {
    pub fn invalid_descriptor(found: &'static str) -> Self {
        Self::InvalidDescriptor { found }
    }

    pub fn invalid_value(
        selector: impl Into<String>,
        key: impl Into<String>,
        found: &'static str,
    ) -> Self {
        Self::InvalidValue {
            selector: selector.into(),
            key: key.into(),
            found,
        }
    }

    pub fn too_deep(selector: impl Into<String>, limit: usize) -> Self {
        Self::TooDeep {
            selector: selector.into(),
            limit,
        }
    }
}
