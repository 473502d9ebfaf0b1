//! Error types for planning and merging.
//!
//! Every variant here is fatal for the run that produced it: no partial
//! [`ChunkPlan`] or [`MergedDocument`] is emitted. Non-fatal conditions are
//! reported as [`Warning`]s instead.
//!
//! [`ChunkPlan`]: crate::ChunkPlan
//! [`MergedDocument`]: crate::MergedDocument
//! [`Warning`]: crate::Warning

use std::path::PathBuf;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `deckchunk` can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A corpus or plan artifact is not valid JSON for its expected shape.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A chunk result is unreadable or not a well-formed record.
    #[error("malformed chunk result {path}: {reason}")]
    StructuralInput { path: PathBuf, reason: String },

    /// No chunk results were available to merge.
    ///
    /// Distinct from a legitimate merge of results that carry zero test cases.
    #[error("no chunk results found in {location}")]
    EmptyInput { location: String },

    /// A single slide exceeds the component bound and the plan was configured
    /// to reject oversized slides.
    #[error(
        "slide {slide_number} has {component_count} components, over the per-chunk limit of {max_components}"
    )]
    CapacityViolation {
        slide_number: u32,
        component_count: usize,
        max_components: usize,
    },

    /// The chunk result discovery pattern could not be compiled.
    #[error("invalid chunk result pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The identifier relocation table could not be compiled.
    #[error("failed to build identifier relocation table: {0}")]
    Relocation(#[from] regex::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn structural(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::StructuralInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
