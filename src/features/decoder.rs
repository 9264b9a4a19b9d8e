//! Audio decoding front end for feature extraction
//!
//! Decodes a source file to mono f32 PCM using symphonia. Any failure to
//! probe or decode the input surfaces as a malformed-audio error naming the
//! offending file.

use crate::error::{MetricsError, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file to mono f32 samples
///
/// Multi-channel audio is downmixed by averaging channels. Returns the
/// samples together with the stream's sample rate.
pub fn decode_to_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    log::debug!("Decoding: {:?}", path);

    let file = std::fs::File::open(path)
        .map_err(|e| MetricsError::malformed(path, format!("failed to open file: {}", e)))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(ext.to_str().unwrap_or(""));
    }

    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| MetricsError::malformed(path, format!("failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| MetricsError::malformed(path, "no audio track found"))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| MetricsError::malformed(path, "no sample rate in audio track"))?;

    let dec_opts = DecoderOptions::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| MetricsError::malformed(path, format!("failed to create decoder: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break; // End of stream
            }
            Err(e) => {
                log::warn!("Error reading packet from {:?}: {}", path, e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Error decoding packet from {:?}: {}", path, e);
                continue;
            }
        };

        let spec = *decoded.spec();
        let capacity = decoded.capacity() as u64;

        let mut sample_buf = SampleBuffer::<f32>::new(capacity, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let interleaved = sample_buf.samples();
        let channels = spec.channels.count();
        if channels > 1 {
            for chunk in interleaved.chunks(channels) {
                let mono: f32 = chunk.iter().sum::<f32>() / channels as f32;
                samples.push(mono);
            }
        } else {
            samples.extend_from_slice(interleaved);
        }
    }

    if samples.is_empty() {
        return Err(MetricsError::malformed(path, "no decodable audio data"));
    }

    log::debug!(
        "Decoded {} samples ({:.1}s) at {}Hz",
        samples.len(),
        samples.len() as f32 / sample_rate as f32,
        sample_rate
    );

    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_malformed_audio() {
        let result = decode_to_mono(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(
            result,
            Err(MetricsError::MalformedAudio { .. })
        ));
    }

    #[test]
    fn garbage_bytes_are_malformed_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not a wav file").unwrap();

        let result = decode_to_mono(&path);
        assert!(matches!(
            result,
            Err(MetricsError::MalformedAudio { .. })
        ));
    }
}
