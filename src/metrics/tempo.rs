//! Local tempo estimation
//!
//! Two views of tempo over time: a sliding-window estimate from beat
//! timestamps, and a per-frame dominant tempo read off the tempogram.

/// Compute a sliding-window local BPM sequence from beat timestamps
///
/// For each start index the mean inter-beat interval over a `window`-beat
/// slice is converted to BPM. The output length is always
/// `max(0, beat_times.len() - window)`; with too few beats the result is
/// empty. A zero mean interval yields `f64::INFINITY`, a documented sentinel
/// rather than an error (it cannot occur for strictly increasing beat times,
/// but the function does not assume validation has run).
pub fn compute_local_bpm(beat_times: &[f64], window: usize) -> Vec<f64> {
    if window < 2 {
        // A window needs at least one interval to average
        return Vec::new();
    }

    let count = beat_times.len().saturating_sub(window);
    let mut local_bpm = Vec::with_capacity(count);

    for slice in beat_times.windows(window).take(count) {
        let interval_sum: f64 = slice.windows(2).map(|pair| pair[1] - pair[0]).sum();
        let mean_interval = interval_sum / (window - 1) as f64;
        local_bpm.push(60.0 / mean_interval);
    }

    local_bpm
}

/// Extract the dominant tempo per tempogram frame
///
/// Valid bins are those whose frequency is finite and inside
/// `[min_bpm, max_bpm]` inclusive. For each frame, the valid bin with the
/// strictly positive maximum energy wins; ties go to the lowest bin index.
/// Frames with no positive energy in any valid bin (including the case of no
/// valid bins at all) are `None`.
///
/// `tempogram` is row-per-bin, column-per-frame; `frequencies` has one entry
/// per row.
pub fn compute_tempogram_tempo(
    tempogram: &[Vec<f64>],
    frequencies: &[f64],
    min_bpm: f64,
    max_bpm: f64,
) -> Vec<Option<f64>> {
    let valid_bins: Vec<usize> = frequencies
        .iter()
        .enumerate()
        .filter(|(_, &f)| f.is_finite() && f >= min_bpm && f <= max_bpm)
        .map(|(i, _)| i)
        .collect();

    let frames = tempogram.first().map_or(0, |row| row.len());
    let mut dominant = vec![None; frames];

    if valid_bins.is_empty() {
        return dominant;
    }

    for (t, slot) in dominant.iter_mut().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for &bin in &valid_bins {
            let energy = tempogram[bin][t];
            // Strict > keeps the first (lowest-index) bin on ties
            if best.map_or(true, |(_, e)| energy > e) {
                best = Some((bin, energy));
            }
        }
        if let Some((bin, energy)) = best {
            if energy > 0.0 {
                *slot = Some(frequencies[bin]);
            }
        }
    }

    dominant
}

/// BPM frequency of each tempogram bin for a given hop configuration
///
/// Bin 0 corresponds to zero lag and is infinite; bin k maps to
/// `60 * sample_rate / (hop * k)` BPM.
pub fn tempo_frequencies(n_bins: usize, hop_length: u32, sample_rate: u32) -> Vec<f64> {
    (0..n_bins)
        .map(|k| {
            if k == 0 {
                f64::INFINITY
            } else {
                60.0 * sample_rate as f64 / (hop_length as f64 * k as f64)
            }
        })
        .collect()
}
