use std::path::PathBuf;

use thiserror::Error;

use crate::kg::LookupError;

/// Errors raised while resolving, loading or querying a dataset.
///
/// Nothing here is retried or logged by the library; each variant is
/// returned at the point where the failure is detected.
#[derive(Debug, Error)]
pub enum DanedError {
    /// The dataset directory could not be produced by the archive provider.
    #[error("dataset '{dataset}' is unavailable: {reason}")]
    DataUnavailable { dataset: String, reason: String },

    /// A JSON sidecar is missing, unreadable or not the expected JSON shape.
    #[error("malformed sidecar {}: {reason}", path.display())]
    MalformedSidecar { path: PathBuf, reason: String },

    #[error("partition file not found: {}", path.display())]
    MissingPartitionFile { path: PathBuf },

    /// The delimited file parsed, but not into the expected columns/values.
    #[error("malformed partition file {}: {reason}", path.display())]
    MalformedPartitionFile { path: PathBuf, reason: String },

    /// Online lookup was requested but no collaborator is attached.
    #[error("online lookup requested for {qid} but no knowledge-graph lookup is configured")]
    OnlineLookupUnavailable { qid: String },

    /// The online collaborator's own error, passed through unchanged.
    #[error(transparent)]
    OnlineLookup(LookupError),

    #[error("arrow export failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet export failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DanedError>;
