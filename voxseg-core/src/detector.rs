//! Top-level detection pipeline.
//!
//! One `detect` call runs the whole chain — band-pass, framing, features,
//! classification, segment cleanup — and returns the cleaned segment list.
//! The call is a pure function of `(buffer, config)`: no state survives it,
//! so a detector can be shared freely across threads and re-run at will.

use tracing::{debug, info};

use crate::buffer::AudioBuffer;
use crate::classify;
use crate::config::DetectorConfig;
use crate::dsp::biquad::BiquadCoeffs;
use crate::error::Result;
use crate::features;
use crate::segment::{self, Segment};

/// Speech-region detector over decoded audio buffers.
#[derive(Debug, Clone, Default)]
pub struct SpeechDetector {
    config: DetectorConfig,
}

impl SpeechDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect speech regions in `audio`.
    ///
    /// Degenerate audio (empty, or shorter than one analysis frame) yields
    /// `Ok(vec![])`. The only error paths are configuration preconditions —
    /// most notably a filter cutoff at or above Nyquist for this buffer's
    /// sample rate.
    pub fn detect(&self, audio: &AudioBuffer) -> Result<Vec<Segment>> {
        self.config.validate(audio.sample_rate)?;

        let frame_len = self.config.frame_len(audio.sample_rate);
        let hop = self.config.hop_len(audio.sample_rate);
        if audio.len() < frame_len {
            debug!(
                samples = audio.len(),
                frame_len, "buffer shorter than one frame"
            );
            return Ok(Vec::new());
        }

        let original: Vec<f64> = audio.samples.iter().map(|&v| v as f64).collect();

        let rate = audio.sample_rate as f64;
        let high_pass = BiquadCoeffs::high_pass(self.config.highpass_hz, self.config.filter_q, rate)?;
        let low_pass = BiquadCoeffs::low_pass(self.config.lowpass_hz, self.config.filter_q, rate)?;
        // Cascade order is fixed: high-pass first, then low-pass.
        let band = low_pass.apply(&high_pass.apply(&original));

        let features = features::extract(&band, &original, frame_len, hop);
        let mask = classify::frame_mask(&features, &self.config);
        let segments = segment::build_segments(
            &mask,
            frame_len,
            hop,
            audio.len(),
            audio.sample_rate,
            &self.config,
        );

        info!(
            segments = segments.len(),
            duration_secs = audio.duration_secs(),
            "speech detection complete"
        );
        Ok(segments)
    }
}

/// Detect speech regions with the default configuration.
///
/// Convenience wrapper over [`SpeechDetector::detect`] for callers that hold
/// plain samples rather than an [`AudioBuffer`].
pub fn detect_speech(samples: &[f32], sample_rate: u32) -> Result<Vec<Segment>> {
    SpeechDetector::default().detect(&AudioBuffer::new(samples.to_vec(), sample_rate))
}
