//! Filename parsing for option documents.
//!
//! Option documents follow a `<name>[_<lang>].md` convention:
//!
//! - `pla.md` → option `pla`, English (the implicit default language)
//! - `pla_de.md` → option `pla`, German
//! - `pla_de_at.md` → malformed, ignored by the loader
//!
//! Underscores therefore cannot appear in option names. Dashes can:
//! `high-temp_de.md` is option `high-temp` in German.

/// Language assumed for documents without a `_<lang>` suffix.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Result of parsing an option document stem like `pla_de`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionStem {
    pub name: String,
    pub lang: String,
}

/// Parse a file stem into option name and language.
///
/// Returns `None` when the stem has more than two `_`-separated segments or
/// when either segment is empty.
pub fn parse_option_stem(stem: &str) -> Option<OptionStem> {
    let parts: Vec<&str> = stem.split('_').collect();
    let (name, lang) = match parts.as_slice() {
        [name] => (*name, DEFAULT_LANGUAGE),
        [name, lang] => (*name, *lang),
        _ => return None,
    };
    if name.is_empty() || lang.is_empty() {
        return None;
    }
    Some(OptionStem {
        name: name.to_string(),
        lang: lang.to_lowercase(),
    })
}
