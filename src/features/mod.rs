//! Feature extraction layer
//!
//! Upstream DSP (beat detection, onset detection, tempogram and spectral
//! feature computation) sits behind the [`FeatureProvider`] trait so real
//! backends can be swapped in without touching the metrics layer. The crate
//! ships the decoding front end and a deterministic stub provider.

pub mod decoder;
mod stub;
mod traits;

pub use decoder::decode_to_mono;
pub use stub::StubProvider;
pub use traits::{FeatureProvider, RawFeatureSet};
