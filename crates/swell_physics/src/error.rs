//! State error types

use std::fmt;

/// Error type for state serialization and integration
#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    /// A state segment would run past the end of the buffer
    OutOfBounds { offset: usize, size: usize, len: usize },
    /// Buffers that must have equal length did not
    LengthMismatch { expected: usize, actual: usize },
    /// Time step was zero, negative or not finite
    InvalidTimeStep(f32),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::OutOfBounds { offset, size, len } => write!(
                f,
                "State segment {}..{} out of bounds for buffer of {} floats",
                offset,
                offset.saturating_add(*size),
                len
            ),
            StateError::LengthMismatch { expected, actual } => {
                write!(f, "State buffer length mismatch: expected {}, got {}", expected, actual)
            }
            StateError::InvalidTimeStep(dt) => {
                write!(f, "Time step must be positive and finite, got {}", dt)
            }
        }
    }
}

impl std::error::Error for StateError {}
