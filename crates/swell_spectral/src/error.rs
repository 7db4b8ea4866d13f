//! Spectral error types
//!
//! Every variant is a precondition violation reported at the call that
//! caused it. Transforms never pad, truncate or fall back to a slower path.

use std::fmt;

/// Error type for transform and spectrum operations
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// Signal had no samples
    Empty,
    /// The fast path was given a length that is not a power of two
    NonPowerOfTwo(usize),
    /// A buffer did not match the length the plan or field was built for
    LengthMismatch { expected: usize, actual: usize },
    /// A spectrum parameter was outside its valid range
    InvalidParameter(String),
}

impl fmt::Display for SpectralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectralError::Empty => write!(f, "Signal must contain at least one sample"),
            SpectralError::NonPowerOfTwo(len) => {
                write!(f, "FFT length must be a power of two, got {}", len)
            }
            SpectralError::LengthMismatch { expected, actual } => {
                write!(f, "Buffer length mismatch: expected {}, got {}", expected, actual)
            }
            SpectralError::InvalidParameter(msg) => write!(f, "Invalid spectrum parameter: {}", msg),
        }
    }
}

impl std::error::Error for SpectralError {}
