//! The options registry: every documented option, loaded once.
//!
//! [`Options::load`] reads the three documentation categories under the wiki
//! root and builds the shared placeholder description. The result is never
//! mutated afterwards; callers hold it by reference for the life of the
//! process. Picking up documentation edits means building a new registry.

use crate::loader::{self, LoadError, OptionCatalog};
use crate::markdown::MarkdownDescription;
use crate::naming::DEFAULT_LANGUAGE;
use crate::option::DescribedOption;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to load {category} options: {source}")]
    Load {
        category: Category,
        #[source]
        source: LoadError,
    },
    #[error("No options for language '{lang}' and no English fallback")]
    NoEnglishFallback { lang: String },
}

/// Documentation categories, one subdirectory of the wiki root each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    ProductionMethods,
    MaterialTypes,
    Colors,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::ProductionMethods, Self::MaterialTypes, Self::Colors];

    /// Directory name under the wiki root, also used as URL slug.
    pub fn slug(self) -> &'static str {
        match self {
            Self::ProductionMethods => "production-methods",
            Self::MaterialTypes => "material-types",
            Self::Colors => "colors",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ProductionMethods => "Production methods",
            Self::MaterialTypes => "Material types",
            Self::Colors => "Colors",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// All option catalogs plus the shared placeholder.
#[derive(Debug, Clone)]
pub struct Options {
    production_methods: OptionCatalog,
    material_types: OptionCatalog,
    material_colors: OptionCatalog,
    placeholder: Arc<MarkdownDescription>,
}

impl Options {
    /// Load every category under `wiki_root`.
    ///
    /// `not_available` is the localized message wrapped into the placeholder
    /// description for undocumented catalog entries.
    pub fn load(wiki_root: &Path, not_available: &str) -> Result<Self, RegistryError> {
        let placeholder = MarkdownDescription::placeholder(not_available);
        let load = |category: Category| {
            let dir = wiki_root.join(category.slug());
            let catalog = loader::load_options_from_path(&dir, &placeholder)
                .map_err(|source| RegistryError::Load { category, source })?;
            info!(
                category = %category,
                languages = catalog.languages().count(),
                "loaded option documents"
            );
            Ok::<_, RegistryError>(catalog)
        };

        Ok(Self {
            production_methods: load(Category::ProductionMethods)?,
            material_types: load(Category::MaterialTypes)?,
            material_colors: load(Category::Colors)?,
            placeholder,
        })
    }

    pub fn placeholder(&self) -> &Arc<MarkdownDescription> {
        &self.placeholder
    }

    pub fn catalog(&self, category: Category) -> &OptionCatalog {
        match category {
            Category::ProductionMethods => &self.production_methods,
            Category::MaterialTypes => &self.material_types,
            Category::Colors => &self.material_colors,
        }
    }

    /// Options of `category` in `lang`, falling back to English.
    pub fn for_language(
        &self,
        category: Category,
        lang: &str,
    ) -> Result<&[DescribedOption], RegistryError> {
        for_language(self.catalog(category), lang)
    }

    pub fn production_methods(&self, lang: &str) -> Result<&[DescribedOption], RegistryError> {
        self.for_language(Category::ProductionMethods, lang)
    }

    pub fn material_types(&self, lang: &str) -> Result<&[DescribedOption], RegistryError> {
        self.for_language(Category::MaterialTypes, lang)
    }

    pub fn material_colors(&self, lang: &str) -> Result<&[DescribedOption], RegistryError> {
        self.for_language(Category::Colors, lang)
    }
}

/// `catalog[lang]` if present, else `catalog["en"]`.
pub fn for_language<'a>(
    catalog: &'a OptionCatalog,
    lang: &str,
) -> Result<&'a [DescribedOption], RegistryError> {
    catalog
        .get(&lang.to_lowercase())
        .or_else(|| catalog.get(DEFAULT_LANGUAGE))
        .ok_or_else(|| RegistryError::NoEnglishFallback {
            lang: lang.to_string(),
        })
}
