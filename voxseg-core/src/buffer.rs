//! Decoded audio handed to the detector.

/// A fully decoded block of mono PCM samples at a known sample rate.
///
/// The detector only reads the buffer; it is allocated once by the caller
/// (typically the decoding side of an audio player) and dropped afterwards.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Mono f32 samples in [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g. 16000, 44100, 48000).
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Build a buffer from interleaved multi-channel samples, keeping only
    /// channel 0. Detection never looks at the other channels.
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        let mono = samples.iter().copied().step_by(channels).collect();
        Self::new(mono, sample_rate)
    }

    /// Returns the duration of this buffer in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Number of samples per channel (the buffer is mono, so the total).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
