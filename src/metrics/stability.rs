//! Aggregate stability and variability metrics
//!
//! Scalar summaries of the derived tempo series and beat timestamps. All
//! statistics here are population statistics (divisor N). Undefined values
//! from empty or degenerate inputs are `None` sentinels, never panics.

/// Arithmetic mean; `None` on an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation (divisor N); `None` on an empty slice
pub fn pop_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Tempo stability score: `exp(-pop_std(local_bpm) / tau)`
///
/// Exactly 1.0 for a perfectly steady local tempo (zero variance) and
/// approaching 0 as the variance grows. `None` when the local-BPM series is
/// empty (too few beats for even one window).
pub fn tempo_stability_score(local_bpm: &[f64], tau: f64) -> Option<f64> {
    pop_std(local_bpm).map(|std| (-std / tau).exp())
}

/// Inter-beat-interval summary, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IbiStats {
    /// Mean inter-beat interval, ms
    pub mean_ms: Option<f64>,
    /// Population standard deviation of the intervals, ms
    pub std_ms: Option<f64>,
    /// Coefficient of variation, percent; undefined when the mean is 0
    pub cv_percent: Option<f64>,
}

/// Compute inter-beat-interval statistics from beat timestamps
///
/// Fewer than two beats leave every field undefined.
pub fn ibi_stats(beat_times: &[f64]) -> IbiStats {
    let intervals_ms: Vec<f64> = beat_times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) * 1000.0)
        .collect();

    let mean_ms = mean(&intervals_ms);
    let std_ms = pop_std(&intervals_ms);
    let cv_percent = match (mean_ms, std_ms) {
        (Some(m), Some(s)) if m != 0.0 => Some(100.0 * s / m),
        _ => None,
    };

    IbiStats {
        mean_ms,
        std_ms,
        cv_percent,
    }
}

/// Beat-to-grid quantization jitter, in milliseconds
///
/// Each beat time is quantized to the nearest analysis-frame boundary
/// (`frame = round(t * sr / hop)`, `quantized = frame * hop / sr`) and the
/// population standard deviation of the per-beat deviations is reported.
/// This measures the quantization artifact introduced by the frame hop size,
/// not intrinsic performance timing. `None` when there are no beats.
pub fn phase_error_std_ms(beat_times: &[f64], sample_rate: u32, hop_length: u32) -> Option<f64> {
    let sr = sample_rate as f64;
    let hop = hop_length as f64;

    let errors: Vec<f64> = beat_times
        .iter()
        .map(|&t| {
            let frame = (t * sr / hop).round();
            let quantized = frame * hop / sr;
            t - quantized
        })
        .collect();

    pop_std(&errors).map(|std| std * 1000.0)
}

/// Onsets per second; `None` when the duration is not positive
pub fn onset_density(onset_times: &[f64], duration_sec: f64) -> Option<f64> {
    if duration_sec > 0.0 {
        Some(onset_times.len() as f64 / duration_sec)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_std_uses_divisor_n() {
        // pop std of [1, 3] is 1.0 (the sample std would be sqrt(2))
        let std = pop_std(&[1.0, 3.0]).unwrap();
        assert!((std - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stability_score_is_one_at_zero_variance() {
        let score = tempo_stability_score(&[120.0; 6], 5.0).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn stability_score_decreases_with_variance() {
        let steady = tempo_stability_score(&[120.0, 121.0, 119.0], 5.0).unwrap();
        let wobbly = tempo_stability_score(&[100.0, 140.0, 90.0], 5.0).unwrap();
        assert!(steady > wobbly);
        assert!(steady > 0.0 && steady <= 1.0);
        assert!(wobbly > 0.0 && wobbly < 1.0);
    }

    #[test]
    fn stability_score_undefined_on_empty_series() {
        assert!(tempo_stability_score(&[], 5.0).is_none());
    }

    #[test]
    fn ibi_stats_on_steady_grid() {
        let beats: Vec<f64> = (0..8).map(|i| i as f64 * 0.5).collect();
        let stats = ibi_stats(&beats);
        assert!((stats.mean_ms.unwrap() - 500.0).abs() < 1e-9);
        assert!(stats.std_ms.unwrap().abs() < 1e-9);
        assert!(stats.cv_percent.unwrap().abs() < 1e-9);
    }

    #[test]
    fn ibi_stats_undefined_below_two_beats() {
        let stats = ibi_stats(&[1.0]);
        assert!(stats.mean_ms.is_none());
        assert!(stats.std_ms.is_none());
        assert!(stats.cv_percent.is_none());

        let stats = ibi_stats(&[]);
        assert!(stats.mean_ms.is_none());
    }

    #[test]
    fn ibi_cv_undefined_when_mean_is_zero() {
        // Symmetric intervals around zero: mean 0, std > 0
        let stats = ibi_stats(&[0.0, 0.5, 0.0]);
        assert_eq!(stats.mean_ms, Some(0.0));
        assert!(stats.std_ms.unwrap() > 0.0);
        assert!(stats.cv_percent.is_none());
    }

    #[test]
    fn phase_error_zero_for_frame_aligned_beats() {
        // Beats placed exactly on frame boundaries for sr=44100, hop=512
        let hop_sec = 512.0 / 44100.0;
        let beats: Vec<f64> = (1..10).map(|i| i as f64 * 40.0 * hop_sec).collect();
        let std_ms = phase_error_std_ms(&beats, 44100, 512).unwrap();
        assert!(std_ms.abs() < 1e-9);
    }

    #[test]
    fn phase_error_positive_for_offset_beats() {
        let hop_sec = 512.0 / 44100.0;
        // Alternate on-grid and quarter-hop-late beats so the deviations vary
        let beats: Vec<f64> = (1..10)
            .map(|i| {
                let base = i as f64 * 40.0 * hop_sec;
                if i % 2 == 0 {
                    base + hop_sec / 4.0
                } else {
                    base
                }
            })
            .collect();
        let std_ms = phase_error_std_ms(&beats, 44100, 512).unwrap();
        assert!(std_ms > 0.0);
    }

    #[test]
    fn phase_error_undefined_without_beats() {
        assert!(phase_error_std_ms(&[], 44100, 512).is_none());
    }

    #[test]
    fn onset_density_counts_per_second() {
        let density = onset_density(&[0.5, 1.0, 1.5, 2.0], 2.0).unwrap();
        assert!((density - 2.0).abs() < 1e-12);
        assert!(density >= 0.0);
    }

    #[test]
    fn onset_density_undefined_for_zero_duration() {
        assert!(onset_density(&[0.1, 0.2], 0.0).is_none());
        assert!(onset_density(&[], 0.0).is_none());
    }
}
