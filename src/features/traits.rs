//! Feature-provider trait definitions and the raw feature set
//!
//! Low-level acoustic features (beat times, onset strength, tempogram,
//! loudness and brightness curves) are produced by an external DSP
//! collaborator behind the [`FeatureProvider`] trait. The metrics layer only
//! ever consumes a validated [`RawFeatureSet`].

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feature extractor abstraction
///
/// Implementations receive decoded mono samples and the sample rate and
/// return the complete per-file feature set. Failure to process the input
/// surfaces as [`MetricsError::MalformedAudio`].
pub trait FeatureProvider {
    fn extract_features(
        &self,
        samples: &[f32],
        sample_rate: u32,
        source: &Path,
    ) -> Result<RawFeatureSet>;
}

/// Low-level acoustic features for one file
///
/// Produced once per file, consumed by the metrics layer, and discarded after
/// the file's record (and optional plot) is built. Nothing is retained across
/// files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeatureSet {
    /// Sample rate of the decoded audio, Hz
    pub sample_rate: u32,

    /// Track duration in seconds
    pub duration_sec: f64,

    /// Detected beat timestamps in seconds, strictly increasing
    pub beat_times: Vec<f64>,

    /// Onset strength per analysis frame, non-negative
    pub onset_envelope: Vec<f64>,

    /// Tempo-candidate energy matrix: one row per tempo bin, one column per
    /// analysis frame (row length == `onset_envelope.len()`)
    pub tempogram: Vec<Vec<f64>>,

    /// BPM frequency of each tempogram row; may contain non-finite values
    /// (the zero-lag bin is conventionally infinite)
    pub tempo_bin_frequencies: Vec<f64>,

    /// RMS loudness per frame, non-negative
    pub rms: Vec<f64>,

    /// Spectral centroid per frame, Hz, non-negative
    pub spectral_centroid: Vec<f64>,

    /// Detected onset timestamps in seconds
    pub onset_times: Vec<f64>,

    /// Global tempo estimate in BPM; first candidate from the extractor, or
    /// 0.0 when no tempo was detected
    pub global_tempo_bpm: f64,
}

impl RawFeatureSet {
    /// Check the structural invariants the metrics layer relies on
    ///
    /// Violations are provider bugs or corrupt input, so they surface as
    /// [`MetricsError::MalformedAudio`] at this boundary instead of being
    /// silently accepted downstream.
    pub fn validate(&self, source: &Path) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(MetricsError::malformed(source, "sample rate is zero"));
        }

        if let Some(pair) = self.beat_times.windows(2).find(|w| w[1] <= w[0]) {
            return Err(MetricsError::malformed(
                source,
                format!(
                    "beat times not strictly increasing ({:.6} followed by {:.6})",
                    pair[0], pair[1]
                ),
            ));
        }

        let frames = self.onset_envelope.len();
        if let Some((row, len)) = self
            .tempogram
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != frames)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(MetricsError::malformed(
                source,
                format!(
                    "tempogram row {} has {} columns, expected {} (one per onset frame)",
                    row, len, frames
                ),
            ));
        }

        if self.tempo_bin_frequencies.len() != self.tempogram.len() {
            return Err(MetricsError::malformed(
                source,
                format!(
                    "{} tempo bin frequencies for {} tempogram rows",
                    self.tempo_bin_frequencies.len(),
                    self.tempogram.len()
                ),
            ));
        }

        Ok(())
    }
}
