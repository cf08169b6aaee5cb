use thiserror::Error;

/// All errors produced by voxseg-core.
#[derive(Debug, Error)]
pub enum VoxsegError {
    #[error("filter cutoff {cutoff_hz} Hz must lie strictly between 0 and Nyquist ({nyquist_hz} Hz)")]
    CutoffOutOfRange { cutoff_hz: f64, nyquist_hz: f64 },

    #[error("filter Q must be positive, got {0}")]
    InvalidQ(f64),

    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, VoxsegError>;
