//! Crate-level error types.
//!
//! Media failures live next to the media boundary in `audio::types`; the
//! errors here cover everything that can stop the program from starting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a release catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog document: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed store export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate release id `{0}`")]
    DuplicateRelease(String),

    #[error("release `{release}` lists track `{track}` more than once")]
    DuplicateTrack { release: String, track: String },

    #[error("track `{track}` in release `{release}` has no audio url")]
    MissingAudioUrl { release: String, track: String },

    /// Only upcoming releases may ship without a tracklist.
    #[error("release `{0}` has no tracks")]
    EmptyRelease(String),
}

/// Top-level error returned by `runtime::run`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("catalog source `{0}` requires `catalog.path` to be set")]
    MissingCatalogPath(&'static str),
}
