//! Per-file analysis records and batch aggregation
//!
//! [`AnalysisResult`] carries the fixed field set for one file. The field
//! set and its order are identical for every record in a run; both exporters
//! derive their column/key order from it, so the struct declaration order is
//! the single source of truth.

use crate::config::AnalysisConfig;
use crate::features::RawFeatureSet;
use crate::metrics::{
    ibi_stats, onset_density, phase_error_std_ms, tempo_stability_score,
};
use crate::metrics::stability::{mean, pop_std};
use serde::{Deserialize, Serialize};

/// Column/key names, in the exact serialization order of [`AnalysisResult`]
pub const FIELD_NAMES: [&str; 19] = [
    "file",
    "duration_sec",
    "global_bpm",
    "local_bpm_min",
    "local_bpm_mean",
    "local_bpm_max",
    "tempo_std_bpm",
    "tempo_stability_score",
    "ibi_mean_ms",
    "ibi_std_ms",
    "ibi_cv_percent",
    "onsets_per_sec",
    "rms_min",
    "rms_mean",
    "rms_max",
    "centroid_min_hz",
    "centroid_mean_hz",
    "centroid_max_hz",
    "beat_phase_error_std_ms",
];

/// Summary metrics for one analyzed file
///
/// Every numerically-undefined value (empty local-tempo series, zero
/// duration, zero-mean IBI, missing beats) is an explicit `None`, serialized
/// as `null` in JSON and an empty cell in CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Base name of the analyzed file
    pub file: String,

    /// Track duration in seconds
    pub duration_sec: f64,

    /// Global tempo estimate from the feature provider (0.0 = undetected)
    pub global_bpm: f64,

    pub local_bpm_min: Option<f64>,
    pub local_bpm_mean: Option<f64>,
    pub local_bpm_max: Option<f64>,

    /// Population standard deviation of the local-BPM series
    pub tempo_std_bpm: Option<f64>,

    /// exp(-tempo_std_bpm / tau); 1.0 = perfectly steady tempo
    pub tempo_stability_score: Option<f64>,

    pub ibi_mean_ms: Option<f64>,
    pub ibi_std_ms: Option<f64>,
    pub ibi_cv_percent: Option<f64>,

    pub onsets_per_sec: Option<f64>,

    pub rms_min: Option<f64>,
    pub rms_mean: Option<f64>,
    pub rms_max: Option<f64>,

    pub centroid_min_hz: Option<f64>,
    pub centroid_mean_hz: Option<f64>,
    pub centroid_max_hz: Option<f64>,

    /// Beat-to-frame-grid quantization jitter, ms
    pub beat_phase_error_std_ms: Option<f64>,
}

/// Minimum of a series; `None` when empty
fn series_min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Maximum of a series; `None` when empty
fn series_max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

impl AnalysisResult {
    /// Assemble a record from the raw features and the derived local-BPM
    /// series
    ///
    /// `local_bpm` is passed in rather than recomputed because the caller
    /// also feeds it to the plot renderer.
    pub fn from_features(
        file: &str,
        features: &RawFeatureSet,
        local_bpm: &[f64],
        config: &AnalysisConfig,
    ) -> Self {
        let ibi = ibi_stats(&features.beat_times);

        Self {
            file: file.to_string(),
            duration_sec: features.duration_sec,
            global_bpm: features.global_tempo_bpm,
            local_bpm_min: series_min(local_bpm),
            local_bpm_mean: mean(local_bpm),
            local_bpm_max: series_max(local_bpm),
            tempo_std_bpm: pop_std(local_bpm),
            tempo_stability_score: tempo_stability_score(local_bpm, config.stability_tau),
            ibi_mean_ms: ibi.mean_ms,
            ibi_std_ms: ibi.std_ms,
            ibi_cv_percent: ibi.cv_percent,
            onsets_per_sec: onset_density(&features.onset_times, features.duration_sec),
            rms_min: series_min(&features.rms),
            rms_mean: mean(&features.rms),
            rms_max: series_max(&features.rms),
            centroid_min_hz: series_min(&features.spectral_centroid),
            centroid_mean_hz: mean(&features.spectral_centroid),
            centroid_max_hz: series_max(&features.spectral_centroid),
            beat_phase_error_std_ms: phase_error_std_ms(
                &features.beat_times,
                features.sample_rate,
                config.hop_length,
            ),
        }
    }

    /// Field values as CSV cells, in [`FIELD_NAMES`] order
    ///
    /// `None` becomes an empty cell.
    pub fn csv_row(&self) -> Vec<String> {
        fn cell(v: Option<f64>) -> String {
            v.map(|x| x.to_string()).unwrap_or_default()
        }

        vec![
            self.file.clone(),
            self.duration_sec.to_string(),
            self.global_bpm.to_string(),
            cell(self.local_bpm_min),
            cell(self.local_bpm_mean),
            cell(self.local_bpm_max),
            cell(self.tempo_std_bpm),
            cell(self.tempo_stability_score),
            cell(self.ibi_mean_ms),
            cell(self.ibi_std_ms),
            cell(self.ibi_cv_percent),
            cell(self.onsets_per_sec),
            cell(self.rms_min),
            cell(self.rms_mean),
            cell(self.rms_max),
            cell(self.centroid_min_hz),
            cell(self.centroid_mean_hz),
            cell(self.centroid_max_hz),
            cell(self.beat_phase_error_std_ms),
        ]
    }
}

/// Ordered collection of per-file records for one run
///
/// Insertion order is file-processing order; records are only ever appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResultSet {
    records: Vec<AnalysisResult>,
}

impl BatchResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; call order defines export order
    pub fn push(&mut self, result: AnalysisResult) {
        self.records.push(result);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AnalysisResult] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.records.iter()
    }
}
