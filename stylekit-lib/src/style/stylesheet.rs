use log::debug;

use crate::error::Result;
use crate::sink::StyleSink;
use crate::style::compiler::compile_descriptor;
use crate::style::descriptor::Descriptor;
use crate::style::render::{render, RenderOptions};
use crate::style::value::Value;

/// A descriptor together with the options it should be rendered with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    descriptor: Descriptor,
    options: RenderOptions,
}

impl StyleSheet {
    pub fn new(descriptor: Descriptor) -> Self {
        StyleSheet {
            descriptor,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.descriptor.insert(key, value);
        self
    }

    pub fn extend(&mut self, descriptor: Descriptor) -> &mut Self {
        self.descriptor.extend(descriptor);
        self
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Compiles and renders the whole sheet.
    pub fn to_css(&self) -> Result<String> {
        let rules = compile_descriptor(&self.descriptor)?;
        render(&rules, &self.options)
    }

    /// Renders the sheet and replaces the sink's contents with it. The sink
    /// is left untouched on error.
    pub fn apply_to<S: StyleSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let css = self.to_css()?;
        debug!("applying {} bytes of {} css", css.len(), self.options.mode);
        sink.replace_css(&css);
        Ok(())
    }
}
