//! Error types for glossary indexing, slug resolution and rendering.

use thiserror::Error;

/// Why a single glossary file could not be turned into a flat mapping.
#[derive(Debug, Error)]
pub enum GlossaryParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value is not an object")]
    NotAnObject,

    #[error("key '{key}' holds {kind}, expected a string, number or boolean")]
    NotFlat { key: String, kind: &'static str },
}

/// A per-file failure while building the glossary index.
///
/// These never escape `GlossaryIndex::build`; the offending file is logged
/// and skipped.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: GlossaryParseError,
    },
}

/// An exercise slug that cannot be mapped onto a glossary path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: &'static str },
}

/// Failure of a whole `render` call.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("course {0} not found")]
    CourseNotFound(i32),

    #[error(transparent)]
    InvalidSlug(#[from] SlugError),

    #[error("data access failed: {0:#}")]
    DataAccess(anyhow::Error),
}
