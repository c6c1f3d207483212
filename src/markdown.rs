//! Markdown-backed descriptions.
//!
//! Option documents are plain Markdown. A [`MarkdownDescription`] keeps the
//! raw text and renders it with pulldown-cmark when asked. Nothing is cached:
//! every call to [`MarkdownDescription::as_html`] parses the text again.
//!
//! ## Placeholder
//!
//! Catalog entries without a document still need a description. The
//! placeholder is an italicized "not available" message built once at
//! startup (see [`crate::registry::Options::load`]) and shared through an
//! [`Arc`] by every option that lacks documentation.

use pulldown_cmark::{Parser, html as md_html};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Raw Markdown text with on-demand HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDescription {
    content: String,
}

impl MarkdownDescription {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Build the shared "not available" description from a localized message.
    pub fn placeholder(not_available: &str) -> Arc<Self> {
        Arc::new(Self::new(format!("*{}*", not_available.trim())))
    }

    /// The raw Markdown text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Render the whole document to HTML.
    pub fn as_html(&self) -> String {
        render(&self.content)
    }

    /// Render only the leading paragraph: every line up to the first empty one.
    pub fn summary(&self) -> String {
        let summary: Vec<&str> = self
            .content
            .lines()
            .take_while(|line| !line.is_empty())
            .collect();
        render(&summary.join("\n"))
    }
}

impl Serialize for MarkdownDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_html())
    }
}

fn render(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraph() {
        let desc = MarkdownDescription::new("Strong plastic.");
        assert_eq!(desc.as_html(), "<p>Strong plastic.</p>\n");
    }

    #[test]
    fn renders_emphasis_and_headers() {
        let desc = MarkdownDescription::new("# Title\n\nSome *soft* text.");
        let html = desc.as_html();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>soft</em>"));
    }

    #[test]
    fn summary_stops_at_first_empty_line() {
        let desc = MarkdownDescription::new("First line\nsecond line\n\nNot included.");
        let summary = desc.summary();
        assert!(summary.contains("First line"));
        assert!(summary.contains("second line"));
        assert!(!summary.contains("Not included"));
    }

    #[test]
    fn summary_of_text_without_blank_line_is_whole_text() {
        let desc = MarkdownDescription::new("Only one paragraph.");
        assert_eq!(desc.summary(), desc.as_html());
    }

    #[test]
    fn summary_of_leading_blank_line_is_empty() {
        let desc = MarkdownDescription::new("\nLater text.");
        assert_eq!(desc.summary(), "");
    }

    #[test]
    fn placeholder_is_italic_message() {
        let placeholder = MarkdownDescription::placeholder("not available");
        assert_eq!(placeholder.content(), "*not available*");
        assert_eq!(placeholder.as_html(), "<p><em>not available</em></p>\n");
    }

    #[test]
    fn placeholder_trims_message() {
        let placeholder = MarkdownDescription::placeholder("  nicht verfügbar \n");
        assert_eq!(placeholder.content(), "*nicht verfügbar*");
    }

    #[test]
    fn serializes_as_rendered_html() {
        let desc = MarkdownDescription::new("Bar baz.");
        let json = serde_json::to_string(&desc).unwrap();
        assert_eq!(json, r#""<p>Bar baz.</p>\n""#);
    }
}
