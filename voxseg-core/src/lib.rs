//! # voxseg-core
//!
//! Offline speech-region detection for decoded audio buffers.
//!
//! ## Pipeline
//!
//! ```text
//! AudioBuffer ──► band-pass (HP 200 Hz → LP 3400 Hz biquads)
//!                      │
//!               frame slicing (20 ms frames, 10 ms hop)
//!                      │
//!        log-energy · zero-crossing rate · spectral flatness
//!                      │
//!        adaptive threshold + 2-of-3 vote + debounce/hangover
//!                      │
//!          segment build (pad · drop short · merge close)
//!                      │
//!                 Vec<Segment> (seconds)
//! ```
//!
//! The whole computation is a pure, synchronous function of the input buffer
//! and the configuration: no I/O, no retained state, safe to call from a
//! worker thread and re-run at any time. Degenerate input (an empty buffer,
//! or one shorter than a single analysis frame) yields an empty segment
//! list, not an error.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod buffer;
pub mod classify;
pub mod config;
pub mod detector;
pub mod dsp;
pub mod error;
pub mod features;
pub mod segment;

// Convenience re-exports for downstream crates
pub use buffer::AudioBuffer;
pub use config::DetectorConfig;
pub use detector::{detect_speech, SpeechDetector};
pub use error::VoxsegError;
pub use segment::Segment;
