//! Named options and their descriptions.
//!
//! A [`DescribedOption`] is one selectable thing (a production method, a
//! material type or a color) together with its documentation. Options are
//! identified by their canonical `name` alone: two options with the same name
//! are the same option, whatever their display names or descriptions say.
//!
//! ## Document format
//!
//! ```text
//! # PLA                 ← optional header, becomes the display name
//!
//! Strong plastic,       ← leading paragraph, becomes the description
//! easy to print.
//!
//! Everything after the first blank line is ignored here.
//! ```

use crate::markdown::MarkdownDescription;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A named option paired with its Markdown description.
#[derive(Debug, Clone)]
pub struct DescribedOption {
    /// Canonical lowercase key, used for equality and lookups.
    pub name: String,
    /// Human label. Taken from the document header when there is one.
    pub display_name: String,
    pub description: Arc<MarkdownDescription>,
}

impl DescribedOption {
    /// `name` is stored in canonical form; `display_name` as given.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: Arc<MarkdownDescription>,
    ) -> Self {
        Self {
            name: canonical_name(&name.into()),
            display_name: display_name.into(),
            description,
        }
    }

    /// An option for a catalog entry that has no document.
    pub fn placeholder(name: &str, placeholder: &Arc<MarkdownDescription>) -> Self {
        Self::new(name, name, Arc::clone(placeholder))
    }

    /// Build an option from a Markdown document.
    ///
    /// A leading `#` header becomes the display name. The first paragraph after
    /// it becomes the description; when there is none, the shared placeholder
    /// is used instead of an empty text.
    pub fn from_markdown(
        name: &str,
        text: &str,
        placeholder: &Arc<MarkdownDescription>,
    ) -> Self {
        let mut lines = text.lines().skip_while(|l| l.trim().is_empty()).peekable();

        let display_name = match lines.peek() {
            Some(first) if first.starts_with('#') => {
                let header = first.replace('#', "").trim().to_string();
                lines.next();
                header
            }
            _ => name.to_string(),
        };

        let summary: String = lines
            .skip_while(|l| l.trim().is_empty())
            .take_while(|l| !l.trim().is_empty())
            .map(|l| format!("{l}\n"))
            .collect();

        let description = if summary.is_empty() {
            Arc::clone(placeholder)
        } else {
            Arc::new(MarkdownDescription::new(summary))
        };

        Self::new(name, display_name, description)
    }

    /// Read a document from disk and build an option from it.
    pub fn from_file(
        path: &Path,
        name: &str,
        placeholder: &Arc<MarkdownDescription>,
    ) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_markdown(name, &text, placeholder))
    }

    /// Case-insensitive match against a catalog name.
    pub fn matches(&self, name: &str) -> bool {
        self.name == canonical_name(name)
    }

    /// Whether this option fell back to the shared placeholder description.
    pub fn is_placeholder(&self, placeholder: &Arc<MarkdownDescription>) -> bool {
        Arc::ptr_eq(&self.description, placeholder)
    }
}

impl PartialEq for DescribedOption {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DescribedOption {}

impl Hash for DescribedOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for DescribedOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Canonical form of an option name: trimmed and lowercased.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}
