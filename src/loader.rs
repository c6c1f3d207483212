//! Option document loading.
//!
//! Scans one documentation directory (e.g. `wiki/material-types/`) and turns
//! its Markdown files into an [`OptionCatalog`]: a mapping from language code
//! to the options documented in that language.
//!
//! ## Directory layout
//!
//! ```text
//! material-types/
//! ├── pla.md          # English (implicit)
//! ├── pla_de.md       # German translation
//! ├── petg.md         # English only, copied into the German bucket
//! └── notes_a_b.md    # Malformed name, ignored
//! ```
//!
//! ## English back-fill
//!
//! After every file is read, each English option is appended to every other
//! language that lacks an option of the same name. The copy is verbatim: a
//! German view shows the English text rather than missing the option.
//!
//! ## Ordering
//!
//! Buckets are sorted by canonical option name, so the result does not depend
//! on filesystem enumeration order.

use crate::markdown::MarkdownDescription;
use crate::naming::{self, DEFAULT_LANGUAGE};
use crate::option::DescribedOption;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Option directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// Options of one category, per language.
#[derive(Debug, Clone, Default)]
pub struct OptionCatalog {
    by_language: BTreeMap<String, Vec<DescribedOption>>,
}

impl OptionCatalog {
    pub fn from_languages(by_language: BTreeMap<String, Vec<DescribedOption>>) -> Self {
        Self { by_language }
    }

    /// Options documented in `lang`, if that language has any documents.
    pub fn get(&self, lang: &str) -> Option<&[DescribedOption]> {
        self.by_language.get(lang).map(Vec::as_slice)
    }

    /// Language codes present, in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }
}

/// Load every `<name>[_<lang>].md` document in `path`.
///
/// Files with malformed names are skipped without error. The English bucket
/// is always present, even when the directory holds no English documents.
pub fn load_options_from_path(
    path: &Path,
    placeholder: &Arc<MarkdownDescription>,
) -> Result<OptionCatalog, LoadError> {
    if !path.is_dir() {
        return Err(LoadError::MissingDirectory(path.to_path_buf()));
    }

    let mut by_language: BTreeMap<String, Vec<DescribedOption>> = BTreeMap::new();
    by_language.insert(DEFAULT_LANGUAGE.to_string(), Vec::new());

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let file = entry.path();
        if !entry.file_type().is_file() || !is_markdown(file) {
            continue;
        }

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let Some(parsed) = naming::parse_option_stem(&stem) else {
            debug!(file = %file.display(), "skipping option document with malformed name");
            continue;
        };

        let option = DescribedOption::from_file(file, &parsed.name, placeholder)?;
        let bucket = by_language.entry(parsed.lang).or_default();
        if bucket.contains(&option) {
            warn!(file = %file.display(), name = %option.name, "duplicate option document ignored");
            continue;
        }
        bucket.push(option);
    }

    backfill_english(&mut by_language);

    for bucket in by_language.values_mut() {
        bucket.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(OptionCatalog { by_language })
}

/// Copy English options into every language bucket that lacks them.
fn backfill_english(by_language: &mut BTreeMap<String, Vec<DescribedOption>>) {
    let english = by_language
        .get(DEFAULT_LANGUAGE)
        .cloned()
        .unwrap_or_default();

    for (lang, bucket) in by_language.iter_mut() {
        for option in &english {
            if !bucket.contains(option) {
                debug!(lang = %lang, name = %option.name, "falling back to English document");
                bucket.push(option.clone());
            }
        }
    }
}

/// Only lowercase `.md` counts; `.MD` files are ignored like any other file.
fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn placeholder() -> Arc<MarkdownDescription> {
        MarkdownDescription::placeholder("not available")
    }

    fn names(options: &[DescribedOption]) -> Vec<&str> {
        options.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn english_and_translation() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pla.md"), "# PLA\n\nStrong plastic.\n").unwrap();
        fs::write(
            tmp.path().join("pla_de.md"),
            "# PLA\n\nStarker Kunststoff.\n",
        )
        .unwrap();

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();

        let en = catalog.get("en").unwrap();
        assert_eq!(names(en), vec!["pla"]);
        assert_eq!(en[0].display_name, "PLA");
        assert!(en[0].description.as_html().contains("Strong plastic."));

        let de = catalog.get("de").unwrap();
        assert_eq!(names(de), vec!["pla"]);
        assert!(de[0].description.as_html().contains("Starker Kunststoff."));
    }

    #[test]
    fn english_only_options_backfilled() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pla.md"), "# PLA\nStrong.").unwrap();
        fs::write(tmp.path().join("petg.md"), "# PETG\nFood safe.").unwrap();
        fs::write(tmp.path().join("pla_de.md"), "# PLA\nStark.").unwrap();

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();

        let de = catalog.get("de").unwrap();
        assert_eq!(names(de), vec!["petg", "pla"]);
        let petg = de.iter().find(|o| o.name == "petg").unwrap();
        assert!(petg.description.as_html().contains("Food safe."));
        let pla = de.iter().find(|o| o.name == "pla").unwrap();
        assert!(pla.description.as_html().contains("Stark."));
    }

    #[test]
    fn malformed_names_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pla.md"), "Strong.").unwrap();
        fs::write(tmp.path().join("pla_de_at.md"), "Stark.").unwrap();

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();
        let langs: Vec<&str> = catalog.languages().collect();
        assert_eq!(langs, vec!["en"]);
        assert_eq!(names(catalog.get("en").unwrap()), vec!["pla"]);
    }

    #[test]
    fn non_markdown_files_and_subdirectories_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pla.md"), "Strong.").unwrap();
        fs::write(tmp.path().join("notes.txt"), "not an option").unwrap();
        fs::write(tmp.path().join("ABS.MD"), "Tough.").unwrap();
        fs::write(tmp.path().join("petg.Md"), "Food safe.").unwrap();
        fs::create_dir_all(tmp.path().join("drafts")).unwrap();
        fs::write(tmp.path().join("drafts/abs.md"), "Tough.").unwrap();

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();
        assert_eq!(names(catalog.get("en").unwrap()), vec!["pla"]);
    }

    #[test]
    fn english_bucket_present_without_english_documents() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pla_de.md"), "Stark.").unwrap();

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();
        assert!(catalog.get("en").unwrap().is_empty());
        assert_eq!(names(catalog.get("de").unwrap()), vec!["pla"]);
    }

    #[test]
    fn buckets_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        for name in ["tpu", "abs", "pla", "petg"] {
            fs::write(tmp.path().join(format!("{name}.md")), "Text.").unwrap();
        }

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();
        assert_eq!(
            names(catalog.get("en").unwrap()),
            vec!["abs", "petg", "pla", "tpu"]
        );
    }

    #[test]
    fn names_differing_in_case_collapse() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("PLA.md"), "# Upper\nFirst.").unwrap();
        fs::write(tmp.path().join("pla.md"), "# Lower\nSecond.").unwrap();

        let catalog = load_options_from_path(tmp.path(), &placeholder()).unwrap();
        let en = catalog.get("en").unwrap();
        assert_eq!(en.len(), 1);
        // Sorted file order puts "PLA.md" before "pla.md"
        assert_eq!(en[0].display_name, "Upper");
    }

    #[test]
    fn loading_twice_yields_equal_catalogs() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pla.md"), "# PLA\n\nStrong plastic.\n").unwrap();
        fs::write(tmp.path().join("pla_de.md"), "# PLA\n\nStark.\n").unwrap();
        fs::write(tmp.path().join("abs.md"), "Tough.\n").unwrap();

        let ph = placeholder();
        let first = load_options_from_path(tmp.path(), &ph).unwrap();
        let second = load_options_from_path(tmp.path(), &ph).unwrap();

        let key = |c: &OptionCatalog| -> Vec<(String, String, String, String)> {
            c.languages()
                .flat_map(|lang| {
                    c.get(lang).unwrap().iter().map(move |o| {
                        (
                            lang.to_string(),
                            o.name.clone(),
                            o.display_name.clone(),
                            o.description.as_html(),
                        )
                    })
                })
                .collect()
        };
        assert_eq!(key(&first), key(&second));
    }

    #[test]
    fn missing_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_options_from_path(&tmp.path().join("nope"), &placeholder());
        assert!(matches!(result, Err(LoadError::MissingDirectory(_))));
    }
}
