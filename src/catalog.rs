//! The material catalog: what the lab can actually produce.
//!
//! Catalog rows live in a relational store owned by the web application.
//! This crate reads a TOML snapshot of those tables and answers the few
//! relational questions the option tree and the ticket flow need.
//!
//! ## Snapshot format
//!
//! ```toml
//! [[production_methods]]
//! id = 1
//! name = "FDM"
//!
//! [[material_types]]
//! id = 1
//! name = "PLA"
//! production_method = 1
//!
//! [[material_colors]]
//! id = 1
//! name = "Red"
//! color = 0xd32f2f
//!
//! [[materials]]
//! id = 1
//! name = "PLA Basic Red"
//! material_type = 1
//! color = 1
//! url = "https://example.com/pla-red"
//! optimal_temp = 210.0
//! min_temp = 190.0
//! max_temp = 230.0
//!
//! [[stock]]
//! material = 1
//! label = 1001
//! ```
//!
//! ## Validation
//!
//! Ids are unique per table, every reference resolves, stock labels are
//! unique, and each material's temperatures satisfy `min <= optimal <= max`.

use crate::option::canonical_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Duplicate id {id} in {table}")]
    DuplicateId { table: &'static str, id: u32 },
    #[error("{table} row {id} references missing {field} {target}")]
    DanglingReference {
        table: &'static str,
        id: u32,
        field: &'static str,
        target: u32,
    },
    #[error("Duplicate stock label {0}")]
    DuplicateLabel(u32),
    #[error("Material {0} has inconsistent temperatures (need min <= optimal <= max)")]
    TemperatureRange(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductionMethod {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialType {
    pub id: u32,
    pub name: String,
    pub production_method: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialColor {
    pub id: u32,
    pub name: String,
    /// Display swatch as `0xRRGGBB`.
    #[serde(default)]
    pub color: u32,
}

/// A physical material that is or was in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Material {
    pub id: u32,
    pub name: String,
    pub material_type: u32,
    pub color: u32,
    #[serde(default)]
    pub url: String,
    pub optimal_temp: f64,
    pub min_temp: f64,
    pub max_temp: f64,
}

/// One labelled spool, bottle or bag of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialStock {
    pub material: u32,
    /// Internal label used to identify the physical item.
    pub label: u32,
    #[serde(default)]
    pub consumed: bool,
}

/// How a single uploaded file should be printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    pub file: PathBuf,
    pub count: u32,
    pub material_type: u32,
    pub color: u32,
}

/// A validated snapshot of the catalog tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalog {
    pub production_methods: Vec<ProductionMethod>,
    pub material_types: Vec<MaterialType>,
    pub material_colors: Vec<MaterialColor>,
    pub materials: Vec<Material>,
    pub stock: Vec<MaterialStock>,
}

impl Catalog {
    /// Read and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate snapshot text.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        unique_ids(
            "production_methods",
            self.production_methods.iter().map(|r| r.id),
        )?;
        unique_ids(
            "material_types",
            self.material_types.iter().map(|r| r.id),
        )?;
        unique_ids(
            "material_colors",
            self.material_colors.iter().map(|r| r.id),
        )?;
        unique_ids("materials", self.materials.iter().map(|r| r.id))?;

        for mt in &self.material_types {
            if self.production_method(mt.production_method).is_none() {
                return Err(CatalogError::DanglingReference {
                    table: "material_types",
                    id: mt.id,
                    field: "production_method",
                    target: mt.production_method,
                });
            }
        }

        for m in &self.materials {
            if self.material_type(m.material_type).is_none() {
                return Err(CatalogError::DanglingReference {
                    table: "materials",
                    id: m.id,
                    field: "material_type",
                    target: m.material_type,
                });
            }
            if self.color(m.color).is_none() {
                return Err(CatalogError::DanglingReference {
                    table: "materials",
                    id: m.id,
                    field: "color",
                    target: m.color,
                });
            }
            if !(m.min_temp <= m.optimal_temp && m.optimal_temp <= m.max_temp) {
                return Err(CatalogError::TemperatureRange(m.id));
            }
        }

        let mut labels = HashSet::new();
        for s in &self.stock {
            if self.material(s.material).is_none() {
                return Err(CatalogError::DanglingReference {
                    table: "stock",
                    id: s.label,
                    field: "material",
                    target: s.material,
                });
            }
            if !labels.insert(s.label) {
                return Err(CatalogError::DuplicateLabel(s.label));
            }
        }

        Ok(())
    }

    pub fn production_method(&self, id: u32) -> Option<&ProductionMethod> {
        self.production_methods.iter().find(|r| r.id == id)
    }

    pub fn material_type(&self, id: u32) -> Option<&MaterialType> {
        self.material_types.iter().find(|r| r.id == id)
    }

    pub fn color(&self, id: u32) -> Option<&MaterialColor> {
        self.material_colors.iter().find(|r| r.id == id)
    }

    pub fn material(&self, id: u32) -> Option<&Material> {
        self.materials.iter().find(|r| r.id == id)
    }

    /// Material types belonging to a production method, in table order.
    pub fn material_types_of(&self, production_method: u32) -> impl Iterator<Item = &MaterialType> {
        self.material_types
            .iter()
            .filter(move |mt| mt.production_method == production_method)
    }

    /// Materials of a material type, in table order.
    pub fn materials_of(&self, material_type: u32) -> impl Iterator<Item = &Material> {
        self.materials
            .iter()
            .filter(move |m| m.material_type == material_type)
    }

    /// Stock items of a material that have not been used up.
    pub fn available_stock(&self, material: u32) -> impl Iterator<Item = &MaterialStock> {
        self.stock
            .iter()
            .filter(move |s| s.material == material && !s.consumed)
    }

    /// Look up a material type by its name and its production method's name.
    ///
    /// Names are compared in canonical form, the same form option trees use,
    /// so any name taken from a tree resolves here.
    pub fn find_material_type(&self, production_method: &str, name: &str) -> Option<&MaterialType> {
        let name = canonical_name(name);
        let production_method = canonical_name(production_method);
        self.material_types.iter().find(|mt| {
            canonical_name(&mt.name) == name
                && self
                    .production_method(mt.production_method)
                    .is_some_and(|pm| canonical_name(&pm.name) == production_method)
        })
    }

    /// First color whose canonical name matches.
    pub fn find_color(&self, name: &str) -> Option<&MaterialColor> {
        let name = canonical_name(name);
        self.material_colors
            .iter()
            .find(|c| canonical_name(&c.name) == name)
    }
}

fn unique_ids(table: &'static str, ids: impl Iterator<Item = u32>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { table, id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn loads_fixture_catalog() {
        let tmp = setup_fixtures();
        let catalog = Catalog::load(&tmp.path().join("catalog.toml")).unwrap();
        assert_eq!(catalog.production_methods.len(), 3);
        assert!(!catalog.materials.is_empty());
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let catalog = Catalog::parse("").unwrap();
        assert!(catalog.production_methods.is_empty());
    }

    #[test]
    fn relations_follow_table_order() {
        let catalog = fixture_catalog();
        let fdm = catalog
            .production_methods
            .iter()
            .find(|pm| pm.name == "FDM")
            .unwrap();
        let types: Vec<&str> = catalog
            .material_types_of(fdm.id)
            .map(|mt| mt.name.as_str())
            .collect();
        assert_eq!(types, vec!["PLA", "PETG", "TPU"]);
    }

    #[test]
    fn find_material_type_is_case_insensitive() {
        let catalog = fixture_catalog();
        let pla = catalog.find_material_type("fdm", "pla").unwrap();
        assert_eq!(pla.name, "PLA");
    }

    #[test]
    fn find_material_type_requires_matching_method() {
        let catalog = fixture_catalog();
        assert!(catalog.find_material_type("SLA", "PLA").is_none());
        assert!(catalog.find_material_type("FDM", "Resin").is_none());
    }

    #[test]
    fn find_color_returns_first_match() {
        let catalog = fixture_catalog();
        let red = catalog.find_color("RED").unwrap();
        assert_eq!(red.name, "red");
        assert!(catalog.find_color("purple").is_none());
    }

    #[test]
    fn lookups_match_canonical_names() {
        let catalog = Catalog::parse(
            r#"
[[production_methods]]
id = 1
name = "FDM"

[[material_types]]
id = 1
name = " PLA "
production_method = 1

[[material_colors]]
id = 1
name = "GRÜN"
"#,
        )
        .unwrap();

        assert_eq!(catalog.find_material_type("fdm", "pla").unwrap().id, 1);
        assert_eq!(catalog.find_color("grün").unwrap().id, 1);
        assert_eq!(catalog.find_color(" Grün").unwrap().id, 1);
    }

    #[test]
    fn available_stock_skips_consumed() {
        let catalog = fixture_catalog();
        let labels: Vec<u32> = catalog.available_stock(1).map(|s| s.label).collect();
        assert_eq!(labels, vec![1001]);
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = Catalog::parse(
            r#"
[[production_methods]]
id = 1
name = "FDM"

[[production_methods]]
id = 1
name = "SLA"
"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateId {
                table: "production_methods",
                id: 1
            })
        ));
    }

    #[test]
    fn dangling_reference_rejected() {
        let result = Catalog::parse(
            r#"
[[material_types]]
id = 1
name = "PLA"
production_method = 7
"#,
        );
        assert!(matches!(
            result,
            Err(CatalogError::DanglingReference {
                field: "production_method",
                target: 7,
                ..
            })
        ));
    }

    #[test]
    fn duplicate_stock_label_rejected() {
        let result = Catalog::parse(
            r#"
[[production_methods]]
id = 1
name = "FDM"

[[material_types]]
id = 1
name = "PLA"
production_method = 1

[[material_colors]]
id = 1
name = "Red"

[[materials]]
id = 1
name = "PLA Red"
material_type = 1
color = 1
optimal_temp = 210.0
min_temp = 190.0
max_temp = 230.0

[[stock]]
material = 1
label = 5

[[stock]]
material = 1
label = 5
"#,
        );
        assert!(matches!(result, Err(CatalogError::DuplicateLabel(5))));
    }

    #[test]
    fn temperature_range_checked() {
        let result = Catalog::parse(
            r#"
[[production_methods]]
id = 1
name = "FDM"

[[material_types]]
id = 1
name = "PLA"
production_method = 1

[[material_colors]]
id = 1
name = "Red"

[[materials]]
id = 3
name = "PLA Red"
material_type = 1
color = 1
optimal_temp = 250.0
min_temp = 190.0
max_temp = 230.0
"#,
        );
        assert!(matches!(result, Err(CatalogError::TemperatureRange(3))));
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = Catalog::parse(
            r#"
[[production_methods]]
id = 1
name = "FDM"
speed = "fast"
"#,
        );
        assert!(matches!(result, Err(CatalogError::Toml(_))));
    }
}
