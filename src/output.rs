//! CLI output formatting.
//!
//! Every entity is shown as a header line (positional index + label) with
//! indented context lines beneath it, four spaces per level.
//!
//! # Output Format
//!
//! ## Tree
//!
//! ```text
//! 001 FDM (fdm)
//!     001 PLA (pla)
//!         001 Red (red)
//!         002 Black (black)
//!     002 PETG (petg)
//!         001 Orange (orange) [undocumented]
//! ```
//!
//! ## Check
//!
//! ```text
//! Documentation
//!     production-methods: 2 options [de, en]
//!     material-types: 3 options [de, en]
//!
//! Catalog
//!     3 production methods, 4 material types, 5 colors, 5 materials
//!     2 stock items available
//!
//! Undocumented
//!     colors: Orange
//! ```
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O, so tests
//! can check the exact lines. `print_*` wrappers write them to stdout.

use crate::catalog::Catalog;
use crate::markdown::MarkdownDescription;
use crate::option::DescribedOption;
use crate::registry::{Category, Options};
use crate::tree::ProductionMethodOption;
use std::sync::Arc;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn option_line(
    depth: usize,
    index: usize,
    option: &DescribedOption,
    placeholder: &Arc<MarkdownDescription>,
) -> String {
    let mut line = format!(
        "{}{} {} ({})",
        indent(depth),
        format_index(index),
        option.display_name,
        option.name
    );
    if option.is_placeholder(placeholder) {
        line.push_str(" [undocumented]");
    }
    line
}

// ============================================================================
// Option tree
// ============================================================================

/// Format an option tree, one line per node.
pub fn format_option_tree(tree: &[ProductionMethodOption], options: &Options) -> Vec<String> {
    let placeholder = options.placeholder();
    let mut lines = Vec::new();

    if tree.is_empty() {
        lines.push("(no production methods with available materials)".to_string());
        return lines;
    }

    for (i, pm) in tree.iter().enumerate() {
        lines.push(option_line(0, i + 1, &pm.option, placeholder));
        for (j, mt) in pm.material_types.iter().enumerate() {
            lines.push(option_line(1, j + 1, &mt.option, placeholder));
            for (k, color) in mt.material_colors.iter().enumerate() {
                lines.push(option_line(2, k + 1, &color.option, placeholder));
            }
        }
    }
    lines
}

pub fn print_option_tree(tree: &[ProductionMethodOption], options: &Options) {
    for line in format_option_tree(tree, options) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format a consistency report: documentation coverage and catalog size.
pub fn format_check_output(catalog: &Catalog, options: &Options, lang: &str) -> Vec<String> {
    let mut lines = vec!["Documentation".to_string()];

    for category in Category::ALL {
        let opt_catalog = options.catalog(category);
        let languages: Vec<&str> = opt_catalog.languages().collect();
        let count = opt_catalog.get("en").map(<[_]>::len).unwrap_or(0);
        lines.push(format!(
            "{}{}: {} options [{}]",
            indent(1),
            category.slug(),
            count,
            languages.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push("Catalog".to_string());
    lines.push(format!(
        "{}{} production methods, {} material types, {} colors, {} materials",
        indent(1),
        catalog.production_methods.len(),
        catalog.material_types.len(),
        catalog.material_colors.len(),
        catalog.materials.len()
    ));
    let available: usize = catalog
        .materials
        .iter()
        .map(|m| catalog.available_stock(m.id).count())
        .sum();
    lines.push(format!("{}{} stock items available", indent(1), available));

    let undocumented: Vec<(Category, Vec<&str>)> = Category::ALL
        .into_iter()
        .map(|category| (category, undocumented_names(catalog, options, category, lang)))
        .filter(|(_, names)| !names.is_empty())
        .collect();

    if !undocumented.is_empty() {
        lines.push(String::new());
        lines.push("Undocumented".to_string());
        for (category, names) in undocumented {
            lines.push(format!("{}{}: {}", indent(1), category.slug(), names.join(", ")));
        }
    }

    lines
}

pub fn print_check_output(catalog: &Catalog, options: &Options, lang: &str) {
    for line in format_check_output(catalog, options, lang) {
        println!("{}", line);
    }
}

/// Catalog names of `category` with no document in `lang` (or English).
fn undocumented_names<'a>(
    catalog: &'a Catalog,
    options: &Options,
    category: Category,
    lang: &str,
) -> Vec<&'a str> {
    let documented = options.for_language(category, lang).unwrap_or(&[]);
    let names: Vec<&'a str> = match category {
        Category::ProductionMethods => catalog
            .production_methods
            .iter()
            .map(|r| r.name.as_str())
            .collect(),
        Category::MaterialTypes => catalog
            .material_types
            .iter()
            .map(|r| r.name.as_str())
            .collect(),
        Category::Colors => catalog
            .material_colors
            .iter()
            .map(|r| r.name.as_str())
            .collect(),
    };
    names
        .into_iter()
        .filter(|name| {
            documented
                .iter()
                .find(|d| d.matches(name))
                .is_none_or(|d| d.is_placeholder(options.placeholder()))
        })
        .collect()
}

// ============================================================================
// Written pages
// ============================================================================

/// Format the list of pages written by `wiki` / `ticket`.
pub fn format_written(pages: &[String], output_dir: &std::path::Path) -> Vec<String> {
    let mut lines: Vec<String> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("{} {}", format_index(i + 1), page))
        .collect();
    lines.push(format!("Wrote {} pages to {}", pages.len(), output_dir.display()));
    lines
}

pub fn print_written(pages: &[String], output_dir: &std::path::Path) {
    for line in format_written(pages, output_dir) {
        println!("{}", line);
    }
}
