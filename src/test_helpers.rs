//! Shared test utilities for the plastic-lab test suite.
//!
//! Provides fixture setup, lookup helpers that panic with the available
//! names on a miss, and an option-tree shape assertion.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, catalog, options) = fixture_state();
//! let tree = build_option_tree(&catalog, &options, "en").unwrap();
//!
//! assert_tree_shape(&tree, &[
//!     ("fdm", &[("pla", &["red", "black"])]),
//! ]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::option::DescribedOption;
use crate::registry::Options;
use crate::tree::{MaterialTypeOption, ProductionMethodOption};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` (wiki tree and catalog snapshot) to a temp directory.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// The fixture catalog, read straight from the source tree.
pub fn fixture_catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/catalog.toml");
    Catalog::load(&path).unwrap()
}

/// Registry loaded from a fixture copy.
pub fn load_fixture_options(tmp: &TempDir) -> Options {
    Options::load(&tmp.path().join("wiki"), "not available").unwrap()
}

/// Fixture copy, catalog and registry in one go. Keep the `TempDir` alive.
pub fn fixture_state() -> (TempDir, Catalog, Options) {
    let tmp = setup_fixtures();
    let catalog = Catalog::load(&tmp.path().join("catalog.toml")).unwrap();
    let options = load_fixture_options(&tmp);
    (tmp, catalog, options)
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Canonical names in list order.
pub fn option_names(options: &[DescribedOption]) -> Vec<&str> {
    options.iter().map(|o| o.name.as_str()).collect()
}

/// Find an option by canonical name. Panics if not found.
pub fn find_option<'a>(options: &'a [DescribedOption], name: &str) -> &'a DescribedOption {
    options.iter().find(|o| o.name == name).unwrap_or_else(|| {
        let names = option_names(options);
        panic!("option '{name}' not found. Available: {names:?}")
    })
}

/// Production method names at the tree root, in order.
pub fn method_names(tree: &[ProductionMethodOption]) -> Vec<&str> {
    tree.iter().map(|pm| pm.option.name.as_str()).collect()
}

/// Find a production method node. Panics if not found.
pub fn find_method<'a>(
    tree: &'a [ProductionMethodOption],
    name: &str,
) -> &'a ProductionMethodOption {
    tree.iter().find(|pm| pm.option.name == name).unwrap_or_else(|| {
        let names = method_names(tree);
        panic!("production method '{name}' not found. Available: {names:?}")
    })
}

/// Find a material type node under a production method. Panics if not found.
pub fn find_type<'a>(pm: &'a ProductionMethodOption, name: &str) -> &'a MaterialTypeOption {
    pm.material_types
        .iter()
        .find(|mt| mt.option.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = pm
                .material_types
                .iter()
                .map(|mt| mt.option.name.as_str())
                .collect();
            panic!(
                "material type '{name}' not found under '{}'. Available: {names:?}",
                pm.option.name
            )
        })
}

// =========================================================================
// Tree shape
// =========================================================================

/// Assert the full tree: methods, their material types, and their colors.
///
/// ```rust
/// assert_tree_shape(&tree, &[
///     ("fdm", &[("pla", &["red", "black"]), ("petg", &["orange"])]),
///     ("sla", &[("resin", &["white"])]),
/// ]);
/// ```
pub fn assert_tree_shape(
    tree: &[ProductionMethodOption],
    expected: &[(&str, &[(&str, &[&str])])],
) {
    let expected_methods: Vec<&str> = expected.iter().map(|(m, _)| *m).collect();
    assert_eq!(
        method_names(tree),
        expected_methods,
        "production methods mismatch"
    );

    for (method, types) in expected {
        let pm = find_method(tree, method);
        let actual_types: Vec<&str> = pm
            .material_types
            .iter()
            .map(|mt| mt.option.name.as_str())
            .collect();
        let expected_types: Vec<&str> = types.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            actual_types, expected_types,
            "material types of '{method}' mismatch"
        );

        for (material_type, colors) in types.iter() {
            let mt = find_type(pm, material_type);
            let actual_colors: Vec<&str> = mt
                .material_colors
                .iter()
                .map(|c| c.option.name.as_str())
                .collect();
            assert_eq!(
                actual_colors,
                colors.to_vec(),
                "colors of '{method}/{material_type}' mismatch"
            );
        }
    }
}
