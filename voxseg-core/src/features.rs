//! Frame slicing and per-frame feature extraction.
//!
//! Frames are `frame_len` samples long and advance by `hop`; a frame exists
//! only when it fits entirely inside the signal. Per frame the extractor
//! computes:
//!
//! - **log-energy** and **zero-crossing rate** on the band-pass-filtered
//!   signal;
//! - **spectral flatness** on the original, unfiltered signal — the band-pass
//!   would strip part of the tonal structure the flatness measure needs.

use tracing::debug;

use crate::dsp::fft::RealFft;

/// Additive guard against `log(0)` and zero denominators.
pub(crate) const EPS: f64 = 1e-12;

/// Per-frame feature sequences, indexed by frame number.
///
/// The three vectors always have equal length. Created once per detection
/// pass and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct FrameFeatures {
    /// `10·log10(mean square + ε)` of the filtered frame, in dB.
    pub log_energy_db: Vec<f64>,
    /// Adjacent sign changes over `frame_len − 1`, in [0, 1].
    pub zcr: Vec<f64>,
    /// Geometric over arithmetic mean of the magnitude spectrum, > 0.
    pub flatness: Vec<f64>,
}

impl FrameFeatures {
    /// Number of analysis frames.
    pub fn len(&self) -> usize {
        self.log_energy_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log_energy_db.is_empty()
    }
}

/// Extract features from the filtered signal and its unfiltered original.
///
/// Both slices must have the same length. A signal shorter than one frame
/// yields an empty [`FrameFeatures`].
pub fn extract(
    filtered: &[f64],
    original: &[f64],
    frame_len: usize,
    hop: usize,
) -> FrameFeatures {
    debug_assert_eq!(filtered.len(), original.len());
    debug_assert!(frame_len >= 1 && hop >= 1);

    let mut features = FrameFeatures::default();
    if filtered.len() < frame_len {
        return features;
    }

    let fft_size = frame_len.next_power_of_two();
    let fft = RealFft::new(fft_size);

    let mut i = 0;
    while i + frame_len <= filtered.len() {
        let frame = &filtered[i..i + frame_len];
        features.log_energy_db.push(log_energy_db(frame));
        features.zcr.push(zero_crossing_rate(frame));
        features
            .flatness
            .push(spectral_flatness(&fft, &original[i..i + frame_len]));
        i += hop;
    }

    debug!(
        frames = features.len(),
        frame_len,
        hop,
        fft_size,
        "frame features extracted"
    );
    features
}

fn log_energy_db(frame: &[f64]) -> f64 {
    let mean_sq = frame.iter().map(|v| v * v).sum::<f64>() / frame.len() as f64;
    10.0 * (mean_sq + EPS).log10()
}

fn zero_crossing_rate(frame: &[f64]) -> f64 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|w| (w[1] >= 0.0) != (w[0] >= 0.0))
        .count();
    crossings as f64 / (frame.len() - 1) as f64
}

fn spectral_flatness(fft: &RealFft, frame: &[f64]) -> f64 {
    let mags = fft.band_magnitudes(frame, EPS);
    if mags.is_empty() {
        // No usable bins (absurdly small frame) — call it noise-like.
        return 1.0;
    }
    let n = mags.len() as f64;
    let log_mean = mags.iter().map(|m| m.ln()).sum::<f64>() / n;
    let arith_mean = mags.iter().sum::<f64>() / n;
    log_mean.exp() / arith_mean
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn sine(freq_hz: f64, rate: f64, len: usize, amplitude: f64) -> Vec<f64> {
        (0..len)
            .map(|n| amplitude * (2.0 * std::f64::consts::PI * freq_hz * n as f64 / rate).sin())
            .collect()
    }

    fn seeded_noise(len: usize, amplitude: f64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        (0..len).map(|_| rng.gen_range(-amplitude..amplitude)).collect()
    }

    #[test]
    fn frame_count_follows_hop_arithmetic() {
        let signal = vec![0.0; 1_000];
        let features = extract(&signal, &signal, 320, 160);
        // Starts 0, 160, 320, 480, 640 fit; 800 + 320 > 1000.
        assert_eq!(features.len(), 5);
        assert_eq!(features.zcr.len(), 5);
        assert_eq!(features.flatness.len(), 5);
    }

    #[test]
    fn signal_shorter_than_one_frame_yields_no_frames() {
        let signal = vec![0.5; 100];
        let features = extract(&signal, &signal, 320, 160);
        assert!(features.is_empty());
    }

    #[test]
    fn log_energy_of_known_amplitude() {
        let signal = vec![0.5; 320];
        let features = extract(&signal, &signal, 320, 160);
        // mean square 0.25 → 10·log10(0.25) ≈ -6.0206 dB
        assert_relative_eq!(features.log_energy_db[0], -6.0206, epsilon = 1e-3);
    }

    #[test]
    fn log_energy_of_silence_is_guarded() {
        let signal = vec![0.0; 320];
        let features = extract(&signal, &signal, 320, 160);
        assert_relative_eq!(features.log_energy_db[0], -120.0, epsilon = 1e-9);
    }

    #[test]
    fn zcr_of_alternating_signal_is_one() {
        let signal: Vec<f64> = (0..320).map(|n| if n % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let features = extract(&signal, &signal, 320, 160);
        assert_relative_eq!(features.zcr[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn zcr_of_constant_signal_is_zero() {
        let signal = vec![0.5; 320];
        let features = extract(&signal, &signal, 320, 160);
        assert_relative_eq!(features.zcr[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn sine_tone_zcr_tracks_frequency() {
        // 640 Hz at 16 kHz crosses zero 2·640 times per second → zcr ≈ 0.08.
        let signal = sine(640.0, 16_000.0, 320, 0.5);
        let features = extract(&signal, &signal, 320, 160);
        assert!((features.zcr[0] - 0.08).abs() < 0.01, "zcr={}", features.zcr[0]);
    }

    #[test]
    fn tone_is_tonal_and_noise_is_flat() {
        // Spectral leakage from a non-bin-aligned tone keeps its flatness
        // well above zero, but still clearly below broadband noise.
        let tone = sine(640.0, 16_000.0, 320, 0.5);
        let noise = seeded_noise(320, 0.5);

        let tone_features = extract(&tone, &tone, 320, 160);
        let noise_features = extract(&noise, &noise, 320, 160);

        assert!(
            tone_features.flatness[0] < 0.4,
            "tone flatness {}",
            tone_features.flatness[0]
        );
        assert!(
            noise_features.flatness[0] > 0.5,
            "noise flatness {}",
            noise_features.flatness[0]
        );
        assert!(tone_features.flatness[0] < noise_features.flatness[0]);
    }

    #[test]
    fn flatness_reads_the_original_signal() {
        // Filtered channel silent, original carries a tone: energy must be
        // at the silence floor while flatness still sees the tone.
        let filtered = vec![0.0; 320];
        let original = sine(640.0, 16_000.0, 320, 0.5);
        let features = extract(&filtered, &original, 320, 160);
        assert_relative_eq!(features.log_energy_db[0], -120.0, epsilon = 1e-9);
        assert!(features.flatness[0] < 0.4);
    }
}
