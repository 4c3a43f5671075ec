//! Targets that rendered CSS gets assigned into.

/// Something that holds style text, like a `<style>` element's
/// `textContent` or a constructable stylesheet.
pub trait StyleSink {
    /// Replaces the current contents with `css`.
    fn replace_css(&mut self, css: &str);
}

impl StyleSink for String {
    fn replace_css(&mut self, css: &str) {
        self.clear();
        self.push_str(css);
    }
}

/// In-memory stand-in for a `<style>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleElement {
    text_content: String,
    media: Option<String>,
    generation: usize,
}

impl StyleElement {
    pub fn new() -> Self {
        StyleElement::default()
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }

    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    /// How many times the contents have been replaced.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Serializes the element as HTML.
    pub fn to_html(&self) -> String {
        // `</style` would end the element early
        let text = self.text_content.replace("</", "<\\/");
        match &self.media {
            Some(media) => format!(
                "<style media=\"{}\">{}</style>",
                media.replace('"', "&quot;"),
                text
            ),
            None => format!("<style>{}</style>", text),
        }
    }
}

impl StyleSink for StyleElement {
    fn replace_css(&mut self, css: &str) {
        self.text_content.clear();
        self.text_content.push_str(css);
        self.generation += 1;
    }
}
