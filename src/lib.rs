//! Rhythm-Metrics - objective audio analysis for music benchmarking
//!
//! Computes rhythmic-stability and timbral-range metrics (tempo consistency,
//! beat-grid alignment, dynamic and spectral range) from low-level acoustic
//! features, and aggregates them into per-file and per-batch reports with
//! optional diagnostic plots.

pub mod config;
pub mod error;
pub mod features;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod report;

pub use config::{AnalysisConfig, ExportFormat, PlotFormat};
pub use error::{MetricsError, Result};
pub use features::{FeatureProvider, RawFeatureSet, StubProvider};
pub use pipeline::BatchRunner;
pub use report::{AnalysisResult, BatchResultSet};
