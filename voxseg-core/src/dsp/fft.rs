//! Real-input FFT magnitude spectrum, backed by `rustfft`.
//!
//! The transform itself is the library's concern; this wrapper only fixes the
//! conventions the feature extractor relies on: zero-padding to the planned
//! size, and returning magnitudes for bins `1..size/2` (DC and the mirror
//! half excluded).

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// A forward FFT planned once for a fixed power-of-two size.
pub struct RealFft {
    fft: Arc<dyn Fft<f64>>,
    size: usize,
}

impl RealFft {
    /// Plan a forward FFT of `size` points. `size` must be a power of two.
    pub fn new(size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        let fft = FftPlanner::new().plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Magnitude spectrum of `frame`, zero-padded to the planned size.
    ///
    /// Returns `sqrt(re² + im²) + eps` for bins `1..size/2`. `frame` must not
    /// be longer than the planned size.
    pub fn band_magnitudes(&self, frame: &[f64], eps: f64) -> Vec<f64> {
        debug_assert!(frame.len() <= self.size);
        if self.size < 4 {
            // No bins between DC and the mirror half.
            return Vec::new();
        }
        let mut buf: Vec<Complex<f64>> = Vec::with_capacity(self.size);
        buf.extend(frame.iter().map(|&v| Complex::new(v, 0.0)));
        buf.resize(self.size, Complex::new(0.0, 0.0));
        self.fft.process(&mut buf);
        buf[1..self.size / 2]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt() + eps)
            .collect()
    }
}
