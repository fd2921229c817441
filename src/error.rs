/// Error types for the gallery
///
/// Bootstrap failures are fatal and cross into `main`. Everything that goes
/// wrong with a single catalog entry is an `EntryError`, which the catalog
/// loader logs and skips.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    /// The container cells are rendered into does not exist
    #[error("display surface `{0}` not found")]
    MissingSurface(String),

    /// The text input feeding queries does not exist
    #[error("query input `{0}` not found")]
    MissingQueryInput(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not a JSON array: {0}")]
    CatalogFormat(#[source] serde_json::Error),

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Why a catalog element was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("expected a [name, eps, pdf, root] array")]
    NotATuple,

    #[error("expected 4 fields, found {0}")]
    Arity(usize),

    #[error("missing file name")]
    MissingName,

    #[error("field {0} is not a boolean")]
    BadFlag(usize),

    #[error("duplicate entry `{0}`")]
    Duplicate(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
