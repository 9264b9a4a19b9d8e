//! Stub feature provider
//!
//! Emits a deterministic synthetic feature set so the pipeline, exporters and
//! CLI can run end-to-end before a real DSP backend is wired in behind
//! [`FeatureProvider`]. Loudness is measured from the decoded samples; the
//! rhythmic features are a perfect click grid at a configurable tempo, and
//! the tempogram is all-zero energy over the standard bin-frequency set
//! (which the metrics layer reports as an undefined dominant tempo on every
//! frame).

use super::traits::{FeatureProvider, RawFeatureSet};
use crate::error::Result;
use crate::metrics::tempo::tempo_frequencies;
use std::path::Path;

/// Synthetic feature provider with a fixed beat grid
pub struct StubProvider {
    /// Tempo of the synthetic beat grid, BPM
    grid_bpm: f64,
    /// Analysis frame hop length in samples
    hop_length: u32,
    /// Number of tempogram bins to emit
    tempogram_bins: usize,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            grid_bpm: 120.0,
            hop_length: 512,
            tempogram_bins: 32,
        }
    }

    /// Set the synthetic grid tempo
    pub fn with_grid_bpm(mut self, bpm: f64) -> Self {
        self.grid_bpm = bpm;
        self
    }

    /// Set the analysis hop length
    pub fn with_hop_length(mut self, hop: u32) -> Self {
        self.hop_length = hop;
        self
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureProvider for StubProvider {
    fn extract_features(
        &self,
        samples: &[f32],
        sample_rate: u32,
        source: &Path,
    ) -> Result<RawFeatureSet> {
        log::debug!("Stub feature extraction (synthetic grid) for: {:?}", source);

        let duration_sec = samples.len() as f64 / sample_rate as f64;
        let hop = self.hop_length as usize;
        let frames = samples.len() / hop + 1;

        // Perfect click grid: one beat every 60/bpm seconds
        let beat_period = 60.0 / self.grid_bpm;
        let mut beat_times = Vec::new();
        let mut t = beat_period;
        while t < duration_sec {
            beat_times.push(t);
            t += beat_period;
        }

        // Loudness is measured, not synthesized
        let rms: Vec<f64> = samples
            .chunks(hop)
            .map(|chunk| {
                let sum_sq: f64 = chunk.iter().map(|&s| s as f64 * s as f64).sum();
                (sum_sq / chunk.len() as f64).sqrt()
            })
            .collect();

        let set = RawFeatureSet {
            sample_rate,
            duration_sec,
            onset_times: beat_times.clone(),
            beat_times,
            onset_envelope: vec![0.0; frames],
            tempogram: vec![vec![0.0; frames]; self.tempogram_bins],
            tempo_bin_frequencies: tempo_frequencies(
                self.tempogram_bins,
                self.hop_length,
                sample_rate,
            ),
            rms,
            spectral_centroid: vec![0.0; frames],
            global_tempo_bpm: self.grid_bpm,
        };

        set.validate(source)?;
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn grid_is_strictly_increasing_and_within_duration() {
        let provider = StubProvider::new().with_grid_bpm(120.0);
        let samples = vec![0.25f32; 44100 * 4]; // 4 seconds
        let set = provider
            .extract_features(&samples, 44100, &PathBuf::from("grid.wav"))
            .unwrap();

        // 120 BPM = one beat per 0.5s, first at 0.5, last below 4.0
        assert_eq!(set.beat_times.len(), 7);
        assert!((set.beat_times[0] - 0.5).abs() < 1e-9);
        assert!(set.beat_times.iter().all(|&b| b < set.duration_sec));
        assert_eq!(set.global_tempo_bpm, 120.0);
    }

    #[test]
    fn rms_matches_constant_signal() {
        let provider = StubProvider::new();
        let samples = vec![0.5f32; 44100];
        let set = provider
            .extract_features(&samples, 44100, &PathBuf::from("flat.wav"))
            .unwrap();

        assert!(!set.rms.is_empty());
        for &r in &set.rms {
            assert!((r - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn tempogram_shape_is_rectangular() {
        let provider = StubProvider::new();
        let samples = vec![0.0f32; 22050];
        let set = provider
            .extract_features(&samples, 22050, &PathBuf::from("z.wav"))
            .unwrap();

        assert_eq!(set.tempogram.len(), set.tempo_bin_frequencies.len());
        for row in &set.tempogram {
            assert_eq!(row.len(), set.onset_envelope.len());
        }
    }
}
