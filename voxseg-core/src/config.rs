//! Detector tuning parameters.
//!
//! Every constant the pipeline uses lives here with a documented default, so
//! the algorithm can be re-tuned (or tested with non-default values) without
//! touching the stage code.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxsegError};

/// Configuration for [`SpeechDetector`](crate::SpeechDetector).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Band-pass lower edge (high-pass cutoff) in Hz. Default: 200.
    pub highpass_hz: f64,
    /// Band-pass upper edge (low-pass cutoff) in Hz. Default: 3400.
    pub lowpass_hz: f64,
    /// Q for both biquad sections. Default: 1/√2 (Butterworth).
    pub filter_q: f64,
    /// Analysis frame length in milliseconds. Default: 20.
    pub frame_ms: f64,
    /// Frame hop in milliseconds. Default: 10.
    pub hop_ms: f64,
    /// Percentile of frame energies taken as the noise floor, in [0, 1].
    /// Default: 0.10.
    pub energy_percentile: f64,
    /// Margin added above the noise-floor percentile, in dB. Default: 15.
    pub energy_margin_db: f64,
    /// Absolute floor for the adaptive energy threshold, in dB. Default: -45.
    pub energy_floor_db: f64,
    /// Lower bound of the speech zero-crossing-rate band. Default: 0.02.
    pub zcr_min: f64,
    /// Upper bound of the speech zero-crossing-rate band. Default: 0.20.
    pub zcr_max: f64,
    /// Frames with spectral flatness at or above this are noise-like.
    /// Default: 0.4.
    pub flatness_max: f64,
    /// Consecutive raw-speech frames required to enter speech. Default: 3.
    pub start_frames: usize,
    /// Silent frames absorbed before speech retracts. Default: 5.
    pub hangover_frames: usize,
    /// Symmetric padding applied to each raw segment, in seconds.
    /// Default: 0.05.
    pub pad_secs: f64,
    /// Padded segments shorter than this are dropped, in seconds.
    /// Default: 0.25.
    pub min_duration_secs: f64,
    /// Segments whose padded gap is at most this are merged, in seconds.
    /// Default: 0.15.
    pub merge_gap_secs: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            highpass_hz: 200.0,
            lowpass_hz: 3400.0,
            filter_q: std::f64::consts::FRAC_1_SQRT_2,
            frame_ms: 20.0,
            hop_ms: 10.0,
            energy_percentile: 0.10,
            energy_margin_db: 15.0,
            energy_floor_db: -45.0,
            zcr_min: 0.02,
            zcr_max: 0.20,
            flatness_max: 0.4,
            start_frames: 3,
            hangover_frames: 5,
            pad_secs: 0.05,
            min_duration_secs: 0.25,
            merge_gap_secs: 0.15,
        }
    }
}

impl DetectorConfig {
    /// Analysis frame length in samples at `sample_rate` (at least 1).
    pub fn frame_len(&self, sample_rate: u32) -> usize {
        ((sample_rate as f64 * self.frame_ms / 1000.0).round() as usize).max(1)
    }

    /// Frame hop in samples at `sample_rate` (at least 1).
    pub fn hop_len(&self, sample_rate: u32) -> usize {
        ((sample_rate as f64 * self.hop_ms / 1000.0).round() as usize).max(1)
    }

    /// Check this configuration against `sample_rate`.
    ///
    /// # Errors
    /// - [`VoxsegError::InvalidConfig`] on a zero sample rate, non-positive
    ///   frame/hop, or an inverted band.
    /// - [`VoxsegError::CutoffOutOfRange`] / [`VoxsegError::InvalidQ`] when
    ///   the filter-design preconditions do not hold.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if sample_rate == 0 {
            return Err(VoxsegError::InvalidConfig("sample rate is zero".into()));
        }
        if !(self.frame_ms > 0.0) || !(self.hop_ms > 0.0) {
            return Err(VoxsegError::InvalidConfig(
                "frame and hop lengths must be positive".into(),
            ));
        }
        if self.filter_q <= 0.0 {
            return Err(VoxsegError::InvalidQ(self.filter_q));
        }
        let nyquist_hz = sample_rate as f64 / 2.0;
        for cutoff_hz in [self.highpass_hz, self.lowpass_hz] {
            if cutoff_hz <= 0.0 || cutoff_hz >= nyquist_hz {
                return Err(VoxsegError::CutoffOutOfRange {
                    cutoff_hz,
                    nyquist_hz,
                });
            }
        }
        if self.highpass_hz >= self.lowpass_hz {
            return Err(VoxsegError::InvalidConfig(format!(
                "high-pass cutoff {} Hz is not below low-pass cutoff {} Hz",
                self.highpass_hz, self.lowpass_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_at_speech_rates() {
        let cfg = DetectorConfig::default();
        for rate in [8_000, 16_000, 44_100, 48_000] {
            cfg.validate(rate).expect("defaults should validate");
        }
    }

    #[test]
    fn frame_and_hop_lengths_at_16k() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.frame_len(16_000), 320);
        assert_eq!(cfg.hop_len(16_000), 160);
    }

    #[test]
    fn frame_len_floors_at_one_sample() {
        let cfg = DetectorConfig::default();
        assert_eq!(cfg.frame_len(1), 1);
        assert_eq!(cfg.hop_len(1), 1);
    }

    #[test]
    fn rejects_cutoff_at_or_above_nyquist() {
        let cfg = DetectorConfig::default();
        // Nyquist at 6 kHz is 3 kHz — the default 3.4 kHz low-pass is out.
        let err = cfg.validate(6_000).unwrap_err();
        assert!(matches!(err, VoxsegError::CutoffOutOfRange { .. }));
    }

    #[test]
    fn rejects_non_positive_q() {
        let cfg = DetectorConfig {
            filter_q: 0.0,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            cfg.validate(16_000).unwrap_err(),
            VoxsegError::InvalidQ(_)
        ));
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let cfg = DetectorConfig::default();
        assert!(matches!(
            cfg.validate(0).unwrap_err(),
            VoxsegError::InvalidConfig(_)
        ));
    }

    #[test]
    fn rejects_inverted_band() {
        let cfg = DetectorConfig {
            highpass_hz: 3400.0,
            lowpass_hz: 200.0,
            ..DetectorConfig::default()
        };
        assert!(matches!(
            cfg.validate(16_000).unwrap_err(),
            VoxsegError::InvalidConfig(_)
        ));
    }
}
