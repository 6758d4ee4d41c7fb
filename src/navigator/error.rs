//! Error types for loading, rendering and persisting positions

use thiserror::Error;

/// Failure to retrieve a pack resource
///
/// A navigator that hits one of these stays unloaded for the rest of its life.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("resource id must not be empty")]
    EmptyResourceId,

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid resource location {location}: {reason}")]
    Location { location: String, reason: String },

    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{location} is not UTF-8 text")]
    NotText { location: String },
}

/// Failure while rendering the record under the cursor
#[derive(Debug, Error)]
pub enum RenderError {
    /// Only reachable when an out-of-range position was restored unchecked
    #[error("cursor {cursor} is outside the {len} loaded records")]
    CursorOutOfRange { cursor: usize, len: usize },

    #[error("failed to persist position: {0}")]
    Store(#[from] StoreError),
}

/// Failure in the persistent position store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
