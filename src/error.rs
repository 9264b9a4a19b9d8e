//! Error types for the analysis pipeline
//!
//! Structural failures (bad paths, bad formats, empty export targets) are
//! typed errors. Numeric edge cases (empty local-tempo series, zero-duration
//! tracks, zero-mean IBIs, all-invalid tempo bins) are explicitly *not*
//! errors: they surface as `None` or infinity sentinels in the metrics layer
//! and never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the rhythm-metrics library
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Unsupported input format '{extension}' (supported: .mp3, .flac, .wav)")]
    UnsupportedFormat { extension: String },

    #[error("No input specified: provide a single file or a batch directory")]
    EmptyInput,

    #[error("Cannot export an empty batch: no records to derive headers from")]
    EmptyBatch,

    #[error("Failed to decode or process audio from {path:?}: {reason}")]
    MalformedAudio { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plot encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MetricsError {
    /// Build a malformed-audio error for the given source path
    pub fn malformed<S: Into<String>>(path: &std::path::Path, reason: S) -> Self {
        Self::MalformedAudio {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, MetricsError>;
