//! Serializable physical state
//!
//! Bodies do not own their integration state. The simulation driver owns one
//! contiguous buffer and hands each body an offset into it; the integrator then
//! sweeps the whole buffer in a single pass.

use crate::error::StateError;

/// A body whose state can be packed into a shared flat buffer
///
/// Each method touches exactly `state_size()` floats starting at `offset`.
pub trait PhysicalState {
    /// Number of floats in this body's state (and derivative) segment
    fn state_size(&self) -> usize;

    /// Write the current state into `out[offset..offset + state_size()]`
    fn serialize_state(&self, out: &mut [f32], offset: usize) -> Result<(), StateError>;

    /// Read back a state previously written by [`Self::serialize_state`]
    ///
    /// This is the exact inverse of `serialize_state`; values are copied bit
    /// for bit.
    fn deserialize_state(&mut self, from: &[f32], offset: usize) -> Result<(), StateError>;

    /// Write the time derivative of the current state at `offset`
    fn serialize_state_derivative(&self, out: &mut [f32], offset: usize) -> Result<(), StateError>;
}

/// Borrow `buf[offset..offset + size]`, failing if it does not fit
pub fn segment(buf: &[f32], offset: usize, size: usize) -> Result<&[f32], StateError> {
    let end = checked_end(buf.len(), offset, size)?;
    Ok(&buf[offset..end])
}

/// Mutable variant of [`segment`]
pub fn segment_mut(buf: &mut [f32], offset: usize, size: usize) -> Result<&mut [f32], StateError> {
    let end = checked_end(buf.len(), offset, size)?;
    Ok(&mut buf[offset..end])
}

fn checked_end(len: usize, offset: usize, size: usize) -> Result<usize, StateError> {
    match offset.checked_add(size) {
        Some(end) if end <= len => Ok(end),
        _ => Err(StateError::OutOfBounds { offset, size, len }),
    }
}
