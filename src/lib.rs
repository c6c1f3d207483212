//! # plastic-lab
//!
//! Tickets and wiki for a 3D-printing lab. Users upload print files and
//! configure each one (production method, material type, color, count); the
//! wiki documents every option in Markdown, per language.
//!
//! # Data Flow
//!
//! ```text
//! wiki/ (Markdown)  →  Options registry ─┐
//!                                        ├→  option tree  →  JSON  →  new-ticket page
//! catalog.toml      →  Catalog ──────────┘
//! ```
//!
//! The registry and the catalog are loaded once at startup and passed by
//! reference to everything that needs them. Option trees are rebuilt per
//! request from both.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`markdown`] | Markdown text with on-demand HTML and summary rendering |
//! | [`option`] | `DescribedOption`: a named option built from a Markdown document |
//! | [`naming`] | `<name>[_<lang>].md` filename convention parser |
//! | [`loader`] | Scans one documentation directory into per-language options |
//! | [`registry`] | The three option catalogs with English fallback |
//! | [`catalog`] | Production methods, material types, colors, materials, stock |
//! | [`tree`] | Joins catalog and registry into the pruned option tree |
//! | [`tickets`] | Uploaded files and cached per-user print configurations |
//! | [`render`] | Wiki and new-ticket pages using Maud |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Documentation Layout
//!
//! ```text
//! wiki/
//! ├── production-methods/
//! │   ├── fdm.md          # English
//! │   └── fdm_de.md       # German
//! ├── material-types/
//! │   └── pla.md
//! └── colors/
//!     └── red.md
//! ```
//!
//! A document's first `#` header becomes the option's display name and its
//! first paragraph the description. Translations missing for a language fall
//! back to the English document; catalog entries without any document get a
//! placeholder "not available" description.

pub mod catalog;
pub mod config;
pub mod loader;
pub mod markdown;
pub mod naming;
pub mod option;
pub mod output;
pub mod registry;
pub mod render;
pub mod tickets;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_helpers;
