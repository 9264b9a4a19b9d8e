//! Analysis configuration
//!
//! All tunables live here and are injected at startup rather than read from
//! module-level state. Defaults: 512-sample hop, 8-beat local-tempo window,
//! tau = 5 BPM stability decay, 40-200 BPM valid tempo band.

use clap::ValueEnum;

/// Supported input audio extensions (lowercase, without the dot)
pub const SUPPORTED_INPUT_EXTENSIONS: &[&str] = &["mp3", "flac", "wav"];

/// Configuration for the per-file analysis pass
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Analysis frame hop length in samples
    pub hop_length: u32,

    /// Number of beats per local-tempo estimation window
    pub local_tempo_window: usize,

    /// Exponential decay constant (BPM) for the tempo stability score
    pub stability_tau: f64,

    /// Lower bound of the valid tempogram bin band, in BPM
    pub min_tempo_bpm: f64,

    /// Upper bound of the valid tempogram bin band, in BPM
    pub max_tempo_bpm: f64,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self {
            hop_length: 512,
            local_tempo_window: 8,
            stability_tau: 5.0,
            min_tempo_bpm: 40.0,
            max_tempo_bpm: 200.0,
        }
    }

    /// Set the analysis hop length
    pub fn with_hop_length(mut self, hop: u32) -> Self {
        self.hop_length = hop;
        self
    }

    /// Set the local-tempo window size in beats
    pub fn with_local_tempo_window(mut self, window: usize) -> Self {
        self.local_tempo_window = window;
        self
    }

    /// Set the valid tempo band for tempogram bin filtering
    pub fn with_tempo_band(mut self, min_bpm: f64, max_bpm: f64) -> Self {
        self.min_tempo_bpm = min_bpm;
        self.max_tempo_bpm = max_bpm;
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Raster format for diagnostic plot output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotFormat {
    /// Portable Network Graphics (lossless)
    Png,
    /// WebP, encoded lossless
    Webp,
}

impl PlotFormat {
    /// File extension for this format, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// File format for the aggregated batch report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of field-keyed records, 2-space indented
    Json,
}

impl ExportFormat {
    /// File extension for this format, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}
