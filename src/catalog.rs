//! Release catalog.
//!
//! Canonical `Track`/`Release` types plus the sources a catalog can come
//! from: the discography bundled with the binary, a catalog TOML file, or
//! a JSON export of the hosted store.

mod model;
mod store;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CatalogError;

pub use model::*;

const BUNDLED: &str = include_str!("catalog/releases.toml");

/// Where the catalog is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Bundled,
    TomlFile(PathBuf),
    StoreExport(PathBuf),
}

impl CatalogSource {
    /// Pick a source for a path given on the command line: `.json` files are
    /// store exports, anything else is read as a catalog document.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::StoreExport(path.to_path_buf())
        } else {
            Self::TomlFile(path.to_path_buf())
        }
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    releases: Vec<Release>,
}

impl Catalog {
    /// Parse a catalog document (`[[releases]]` tables).
    pub fn from_toml_str(doc: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(doc)?;
        Self::new(doc.releases)
    }

    /// The discography compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUNDLED)
    }

    pub fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        match source {
            CatalogSource::Bundled => Self::bundled(),
            CatalogSource::TomlFile(path) => {
                let doc = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.clone(),
                    source,
                })?;
                Self::from_toml_str(&doc)
            }
            CatalogSource::StoreExport(path) => store::load_export(path),
        }
    }
}
