//! Spectral wave synthesis for Swell
//!
//! This crate turns a frequency-domain wave spectrum into a displacement field:
//! - Direct and fast Fourier transforms with their inverses
//! - A deterministic wave spectrum (Phillips) evolved over time
//! - A height field that can be sampled at arbitrary world positions

pub mod error;
pub mod field;
pub mod rng;
pub mod spectrum;
pub mod transform;

// Re-export commonly used types
pub use error::SpectralError;
pub use field::HeightField;
pub use rng::SplitMix64;
pub use spectrum::{phillips, SpectrumParams, WaveSpectrum};
pub use transform::{dft, fft, idft, ifft, FftPlan};
