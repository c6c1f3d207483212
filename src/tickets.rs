//! Ticket drafting: uploaded files and their cached print configurations.
//!
//! A user uploads print files into `<cache_dir>/<user>/` and then configures
//! each one (production method, material type, color, count) on the
//! new-ticket page. Until the ticket is submitted, those configurations are
//! cached per `(file, user)` in a small JSON store.
//!
//! ## Storage
//!
//! The store is a JSON file at `<cache_dir>/.print-configs.json`. A missing,
//! corrupt, or outdated file loads as an empty store: cached drafts are
//! disposable, and the user simply configures the file again.
//!
//! ## Submissions
//!
//! Form submissions name their selections rather than referencing ids. Names
//! are resolved case-insensitively against the catalog; a selection that does
//! not resolve is reported as `Ok(false)` so the caller can show an "invalid
//! selection" message.

use crate::catalog::{Catalog, PrintConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the store file within the cache directory.
const STORE_FILENAME: &str = ".print-configs.json";

/// Version of the store format. Bump to discard existing drafts on change.
const STORE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum TicketError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid file count: {0:?}")]
    InvalidCount(String),
    #[error("Invalid user name: {0:?}")]
    InvalidUser(String),
}

/// The fields posted by the configuration form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigSubmission {
    pub file_count: String,
    pub production_method: String,
    pub material_type: String,
    pub material_color: String,
}

/// A print configuration drafted by a user for one of their files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPrintConfig {
    pub user: String,
    pub config: PrintConfig,
}

/// On-disk store of cached print configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfigStore {
    pub version: u32,
    pub entries: Vec<CachedPrintConfig>,
}

impl PrintConfigStore {
    pub fn empty() -> Self {
        Self {
            version: STORE_VERSION,
            entries: Vec::new(),
        }
    }

    /// Load the store from `cache_dir`, or start empty.
    pub fn load(cache_dir: &Path) -> Self {
        let path = store_path(cache_dir);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(store) if store.version == STORE_VERSION => store,
            Ok(_) | Err(_) => {
                debug!(path = %path.display(), "discarding unreadable print config store");
                Self::empty()
            }
        }
    }

    pub fn save(&self, cache_dir: &Path) -> Result<(), TicketError> {
        fs::create_dir_all(cache_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(store_path(cache_dir), json)?;
        Ok(())
    }

    /// The cached configuration of `file` for `user`.
    pub fn find(&self, file: &Path, user: &str) -> Option<&PrintConfig> {
        self.entries
            .iter()
            .find(|e| e.user == user && e.config.file == file)
            .map(|e| &e.config)
    }

    fn find_mut(&mut self, file: &Path, user: &str) -> Option<&mut PrintConfig> {
        self.entries
            .iter_mut()
            .find(|e| e.user == user && e.config.file == file)
            .map(|e| &mut e.config)
    }
}

/// Path to the store file within a cache directory.
pub fn store_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(STORE_FILENAME)
}

/// Record the configuration submitted for `active_file`.
///
/// Returns `Ok(false)` when the submitted material type (under the submitted
/// production method) or color does not exist in the catalog. Otherwise the
/// existing draft for `(active_file, user)` is updated, or a new one created.
pub fn cache_config(
    store: &mut PrintConfigStore,
    catalog: &Catalog,
    active_file: &Path,
    user: &str,
    submission: &ConfigSubmission,
) -> Result<bool, TicketError> {
    let material_type =
        catalog.find_material_type(&submission.production_method, &submission.material_type);
    let color = catalog.find_color(&submission.material_color);
    let (Some(material_type), Some(color)) = (material_type, color) else {
        debug!(
            production_method = %submission.production_method,
            material_type = %submission.material_type,
            material_color = %submission.material_color,
            "submission does not match the catalog"
        );
        return Ok(false);
    };

    let count = parse_count(&submission.file_count)?;

    if let Some(config) = store.find_mut(active_file, user) {
        config.count = count;
        config.material_type = material_type.id;
        config.color = color.id;
        info!(user, file = %active_file.display(), "updated cached print config");
        return Ok(true);
    }

    store.entries.push(CachedPrintConfig {
        user: user.to_string(),
        config: PrintConfig {
            file: active_file.to_path_buf(),
            count,
            material_type: material_type.id,
            color: color.id,
        },
    });
    info!(user, file = %active_file.display(), "cached new print config");
    Ok(true)
}

fn parse_count(raw: &str) -> Result<u32, TicketError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TicketError::InvalidCount(raw.to_string())),
    }
}

/// The upload directory of a user. User names must be a single path segment.
pub fn user_dir(cache_dir: &Path, user: &str) -> Result<PathBuf, TicketError> {
    let valid = !user.is_empty()
        && user != "."
        && user != ".."
        && !user.contains(['/', '\\']);
    if !valid {
        return Err(TicketError::InvalidUser(user.to_string()));
    }
    Ok(cache_dir.join(user))
}

/// Names of the files a user has uploaded, sorted. Creates the directory.
pub fn pending_files(cache_dir: &Path, user: &str) -> Result<Vec<String>, TicketError> {
    let dir = user_dir(cache_dir, user)?;
    fs::create_dir_all(&dir)?;

    let mut files: Vec<String> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.'))
        .collect();
    files.sort();
    Ok(files)
}

/// Files the user has already configured.
pub fn configured_files<'a>(store: &'a PrintConfigStore, user: &str) -> Vec<&'a Path> {
    store
        .entries
        .iter()
        .filter(|e| e.user == user)
        .map(|e| e.config.file.as_path())
        .collect()
}

/// Delete a user's uploads and drafts.
pub fn clear_user(
    store: &mut PrintConfigStore,
    cache_dir: &Path,
    user: &str,
) -> Result<(), TicketError> {
    let dir = user_dir(cache_dir, user)?;
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    store.entries.retain(|e| e.user != user);
    Ok(())
}

/// The file to configure: the requested one, else the first pending upload.
pub fn active_file(files: &[String], requested: Option<&str>) -> Option<String> {
    match requested {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => files.first().cloned(),
    }
}
