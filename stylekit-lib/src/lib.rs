//! Compile nested style descriptors into CSS text.
//!
//! A descriptor maps selectors to declarations, nested selectors and
//! at-rules. [`style::compiler::compile`] turns it into a list of
//! [`style::rule::Rule`]s and [`style::render::render`] prints them either
//! expanded or minified.

pub mod error;
pub mod sink;

pub mod style {
    pub mod compiler;
    pub mod descriptor;
    pub mod render;
    pub mod rule;
    pub mod stylesheet;
    pub mod units;
    pub mod value;
}

pub use error::{CompileError, Result};
pub use sink::{StyleElement, StyleSink};
pub use style::compiler::{compile, compile_descriptor, compile_scope, compile_selector};
pub use style::descriptor::Descriptor;
pub use style::render::{render, Mode, RenderOptions};
pub use style::rule::{Body, Declaration, Rule};
pub use style::stylesheet::StyleSheet;
pub use style::units::{Dim, Unit};
pub use style::value::Value;
