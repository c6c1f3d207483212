//! The option tree shown on the new-ticket page.
//!
//! Joins the catalog (which methods, types and colors exist, and how they
//! relate) with the documentation registry (how each one is described):
//!
//! ```text
//! FDM                     ← ProductionMethodOption
//! ├── PLA                 ← MaterialTypeOption
//! │   ├── Red             ← MaterialColorOption
//! │   └── Black
//! └── PETG
//!     └── Orange
//! ```
//!
//! ## Rules
//!
//! - Every node carries a [`DescribedOption`]. Catalog rows without a
//!   document get a placeholder option instead of failing the build.
//! - Colors are deduplicated per material type by option equality, which
//!   compares canonical names only: materials colored `red` and `RED` yield a
//!   single entry, described by whichever came first.
//! - A material type with no colors is dropped, and so is a production method
//!   left with no material types.
//!
//! ## JSON
//!
//! ```text
//! [ { "name", "display_name", "description",
//!     "material_types": [ { "name", "display_name", "description",
//!         "material_colors": [ { "name", "display_name", "description" } ] } ] } ]
//! ```
//!
//! `description` is the rendered HTML of the option's description.

use crate::catalog::Catalog;
use crate::markdown::MarkdownDescription;
use crate::option::DescribedOption;
use crate::registry::{Options, RegistryError};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialColorOption {
    pub option: DescribedOption,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTypeOption {
    pub option: DescribedOption,
    pub material_colors: Vec<MaterialColorOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductionMethodOption {
    pub option: DescribedOption,
    pub material_types: Vec<MaterialTypeOption>,
}

/// Build the option tree for `lang` from the catalog and the registry.
///
/// Fails only when the registry has neither `lang` nor English for a category.
pub fn build_option_tree(
    catalog: &Catalog,
    options: &Options,
    lang: &str,
) -> Result<Vec<ProductionMethodOption>, RegistryError> {
    let pm_descriptions = options.production_methods(lang)?;
    let mt_descriptions = options.material_types(lang)?;
    let color_descriptions = options.material_colors(lang)?;
    let placeholder = options.placeholder();

    let mut production_methods = Vec::new();

    for production_method in &catalog.production_methods {
        let mut pm = ProductionMethodOption {
            option: describe(pm_descriptions, &production_method.name, placeholder),
            material_types: Vec::new(),
        };

        for material_type in catalog.material_types_of(production_method.id) {
            let mut mt = MaterialTypeOption {
                option: describe(mt_descriptions, &material_type.name, placeholder),
                material_colors: Vec::new(),
            };

            for material in catalog.materials_of(material_type.id) {
                let Some(color) = catalog.color(material.color) else {
                    continue;
                };
                let option = describe(color_descriptions, &color.name, placeholder);
                if mt.material_colors.iter().any(|c| c.option == option) {
                    continue;
                }
                mt.material_colors.push(MaterialColorOption { option });
            }

            if mt.material_colors.is_empty() {
                debug!(material_type = %material_type.name, "pruning material type without colors");
                continue;
            }
            pm.material_types.push(mt);
        }

        if pm.material_types.is_empty() {
            debug!(
                production_method = %production_method.name,
                "pruning production method without material types"
            );
            continue;
        }
        production_methods.push(pm);
    }

    Ok(production_methods)
}

/// Serialize a tree for embedding in a page.
pub fn option_tree_json(tree: &[ProductionMethodOption]) -> serde_json::Result<String> {
    serde_json::to_string(tree)
}

/// The documented option matching `name`, or a placeholder for it.
fn describe(
    descriptions: &[DescribedOption],
    name: &str,
    placeholder: &Arc<MarkdownDescription>,
) -> DescribedOption {
    descriptions
        .iter()
        .find(|d| d.matches(name))
        .cloned()
        .unwrap_or_else(|| DescribedOption::placeholder(name, placeholder))
}

fn serialize_node<S: Serializer, C: Serialize>(
    serializer: S,
    type_name: &'static str,
    option: &DescribedOption,
    children: Option<(&'static str, &C)>,
) -> Result<S::Ok, S::Error> {
    let len = if children.is_some() { 4 } else { 3 };
    let mut state = serializer.serialize_struct(type_name, len)?;
    state.serialize_field("name", &option.name)?;
    state.serialize_field("display_name", &option.display_name)?;
    state.serialize_field("description", option.description.as_ref())?;
    if let Some((key, children)) = children {
        state.serialize_field(key, children)?;
    }
    state.end()
}

impl Serialize for MaterialColorOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_node::<S, ()>(serializer, "MaterialColorOption", &self.option, None)
    }
}

impl Serialize for MaterialTypeOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_node(
            serializer,
            "MaterialTypeOption",
            &self.option,
            Some(("material_colors", &self.material_colors)),
        )
    }
}

impl Serialize for ProductionMethodOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_node(
            serializer,
            "ProductionMethodOption",
            &self.option,
            Some(("material_types", &self.material_types)),
        )
    }
}
