//! Statistical tempo and stability analysis
//!
//! The core of the crate: sliding-window local tempo, tempogram dominant
//! tempo, and the aggregate stability/variability metrics built on top of
//! them.

pub mod stability;
pub mod tempo;

pub use stability::{
    ibi_stats, onset_density, phase_error_std_ms, tempo_stability_score, IbiStats,
};
pub use tempo::{compute_local_bpm, compute_tempogram_tempo, tempo_frequencies};
