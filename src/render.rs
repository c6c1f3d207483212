//! HTML page rendering.
//!
//! ## Generated Pages
//!
//! - **Wiki index** (`/index.html`): every category with its options
//! - **Wiki sections** (`/{category}/index.html`): one category in full
//! - **New ticket** (`/tickets/new.html`): the user's uploaded files and the
//!   option tree as embedded JSON for the client-side selector
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── production-methods/index.html
//! ├── material-types/index.html
//! ├── colors/index.html
//! └── tickets/new.html
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Option descriptions are rendered Markdown and inserted pre-escaped; every
//! other value goes through maud's escaping.

use crate::option::DescribedOption;
use crate::registry::{Category, Options, RegistryError};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 60rem; margin: 0 auto; padding: 1rem 2rem; }
header.site-header nav a { margin-right: 1rem; }
dl.options dt { font-weight: bold; margin-top: 1rem; }
ul.files li.active { font-weight: bold; }
"#;

/// Renders the base HTML document structure
fn base_document(title: &str, lang: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Site header linking the wiki sections and the ticket page.
fn site_header(current: Option<Category>) -> Markup {
    html! {
        header.site-header {
            nav {
                a href="/" { "Wiki" }
                @for category in Category::ALL {
                    @let is_current = current == Some(category);
                    a class=[is_current.then_some("current")] href={ "/" (category.slug()) "/" } {
                        (category.title())
                    }
                }
                a href="/tickets/new.html" { "New ticket" }
            }
        }
    }
}

fn option_list(options: &[DescribedOption], full: bool) -> Markup {
    html! {
        dl.options {
            @for option in options {
                dt id=(option.name) { (option.display_name) }
                dd {
                    @if full {
                        (PreEscaped(option.description.as_html()))
                    } @else {
                        (PreEscaped(option.description.summary()))
                    }
                }
            }
        }
    }
}

/// Renders the wiki index: every category with option summaries.
pub fn render_wiki_index(options: &Options, lang: &str) -> Result<Markup, RegistryError> {
    let mut sections = Vec::new();
    for category in Category::ALL {
        sections.push((category, options.for_language(category, lang)?));
    }

    let content = html! {
        (site_header(None))
        main.wiki-index {
            h1 { "Wiki" }
            @for (category, entries) in &sections {
                section.wiki-section {
                    h2 {
                        a href={ "/" (category.slug()) "/" } { (category.title()) }
                    }
                    (option_list(entries, false))
                }
            }
        }
    };

    Ok(base_document("Wiki", lang, content))
}

/// Renders one wiki category with full descriptions.
pub fn render_wiki_section(
    options: &Options,
    category: Category,
    lang: &str,
) -> Result<Markup, RegistryError> {
    let entries = options.for_language(category, lang)?;

    let content = html! {
        (site_header(Some(category)))
        main.wiki-section {
            h1 { (category.title()) }
            (option_list(entries, true))
        }
    };

    Ok(base_document(category.title(), lang, content))
}

/// Renders the new-ticket page.
///
/// `tree_json` is the serialized option tree; it is embedded in a JSON script
/// block for the client-side selector.
pub fn render_new_ticket(
    files: &[String],
    active_file: Option<&str>,
    tree_json: &str,
    lang: &str,
) -> Markup {
    let content = html! {
        (site_header(None))
        main.new-ticket {
            h1 { "New ticket" }
            @if files.is_empty() {
                p.no-files { "No uploaded files yet." }
            } @else {
                ul.files {
                    @for file in files {
                        @let is_active = active_file == Some(file.as_str());
                        li class=[is_active.then_some("active")] {
                            a href={ "/tickets/new/" (file) } { (file) }
                        }
                    }
                }
            }
            @if let Some(active) = active_file {
                form.print-config method="post" data-file=(active) {
                    input type="hidden" name="file_count" value="1";
                    div #option-selector {}
                }
            }
            script #option-tree type="application/json" {
                (PreEscaped(escape_script_json(tree_json)))
            }
        }
    };

    base_document("New ticket", lang, content)
}

/// Keep embedded JSON from closing its `<script>` element.
fn escape_script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Write every wiki page and the new-ticket page into `output_dir`.
pub fn write_site(
    options: &Options,
    lang: &str,
    output_dir: &Path,
    ticket_page: Option<Markup>,
) -> Result<Vec<String>, RenderError> {
    let mut written = Vec::new();
    fs::create_dir_all(output_dir)?;

    let index = render_wiki_index(options, lang)?;
    fs::write(output_dir.join("index.html"), index.into_string())?;
    written.push("index.html".to_string());

    for category in Category::ALL {
        let dir = output_dir.join(category.slug());
        fs::create_dir_all(&dir)?;
        let page = render_wiki_section(options, category, lang)?;
        fs::write(dir.join("index.html"), page.into_string())?;
        written.push(format!("{}/index.html", category.slug()));
    }

    if let Some(page) = ticket_page {
        let dir = output_dir.join("tickets");
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("new.html"), page.into_string())?;
        written.push("tickets/new.html".to_string());
    }

    Ok(written)
}

// ============================================================================
// Tests
// ============================================================================
