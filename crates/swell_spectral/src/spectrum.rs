//! Ocean wave spectrum
//!
//! Generates the frequency-domain amplitudes that the inverse transform turns
//! into a height field. Uses the Phillips spectrum with Gaussian random
//! phases, then evolves each mode with the deep-water dispersion relation
//! `ω = √(g|k|)`.
//!
//! Grids are `N × N`, row-major, rows along z and columns along x, stored in
//! FFT index order: index `i` maps to wavenumber `2π·i/L` for `i < N/2` and
//! `2π·(i - N)/L` otherwise. No shift is needed before the inverse transform.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use swell_math::Complex;

use crate::error::SpectralError;
use crate::rng::SplitMix64;

/// Parameters for a Phillips wave spectrum
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectrumParams {
    /// Samples per side (power of two)
    pub grid_size: usize,
    /// World-space side length of the periodic patch (metres)
    pub patch_length: f64,
    /// Wind speed (metres per second)
    pub wind_speed: f64,
    /// Wind direction in the xz plane (normalized internally)
    pub wind_direction: [f64; 2],
    /// Phillips amplitude constant
    pub amplitude: f64,
    /// Gravitational acceleration (positive)
    pub gravity: f64,
    /// Waves shorter than this length (metres) are suppressed
    pub small_wave_cutoff: f64,
    /// Exponent on `|k̂·ŵ|`; higher values align waves with the wind
    pub directional_exponent: i32,
    /// Multiplier for waves travelling against the wind (0.0 - 1.0)
    pub opposing_wave_factor: f64,
    /// Seed for the random phases
    pub seed: u64,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            grid_size: 64,
            patch_length: 100.0,
            wind_speed: 10.0,
            wind_direction: [1.0, 0.0],
            amplitude: 4e-5,
            gravity: 9.81,
            small_wave_cutoff: 0.1,
            directional_exponent: 2,
            opposing_wave_factor: 0.07,
            seed: 0x5eed,
        }
    }
}

impl SpectrumParams {
    /// Check every parameter is in range
    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.grid_size == 0 {
            return Err(SpectralError::Empty);
        }
        if !self.grid_size.is_power_of_two() {
            return Err(SpectralError::NonPowerOfTwo(self.grid_size));
        }
        check_positive("patch_length", self.patch_length)?;
        check_positive("gravity", self.gravity)?;
        check_non_negative("wind_speed", self.wind_speed)?;
        check_non_negative("amplitude", self.amplitude)?;
        check_non_negative("small_wave_cutoff", self.small_wave_cutoff)?;
        if !(0.0..=1.0).contains(&self.opposing_wave_factor) {
            return Err(SpectralError::InvalidParameter(format!(
                "opposing_wave_factor must be in [0, 1], got {}",
                self.opposing_wave_factor
            )));
        }
        let [wx, wz] = self.wind_direction;
        if !(wx.is_finite() && wz.is_finite()) || wx.hypot(wz) == 0.0 {
            return Err(SpectralError::InvalidParameter(
                "wind_direction must be a finite, non-zero vector".to_string(),
            ));
        }
        Ok(())
    }

    /// Unit wind direction
    pub fn wind_unit(&self) -> [f64; 2] {
        let [wx, wz] = self.wind_direction;
        let len = wx.hypot(wz);
        if len > 0.0 {
            [wx / len, wz / len]
        } else {
            [1.0, 0.0]
        }
    }

    /// Wavevector `(kx, kz)` for grid cell `(row, col)`
    pub fn wavevector(&self, row: usize, col: usize) -> [f64; 2] {
        let scale = 2.0 * PI / self.patch_length;
        [
            signed_index(col, self.grid_size) as f64 * scale,
            signed_index(row, self.grid_size) as f64 * scale,
        ]
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), SpectralError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpectralError::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<(), SpectralError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpectralError::InvalidParameter(format!(
            "{} must be non-negative, got {}",
            name, value
        )))
    }
}

/// FFT-order index to signed frequency index
#[inline]
fn signed_index(i: usize, n: usize) -> i64 {
    if i < n / 2 {
        i as i64
    } else {
        i as i64 - n as i64
    }
}

/// Phillips spectrum value at wavevector `k`
///
/// `P(k) = A·exp(-1/(kL)²)/k⁴·|k̂·ŵ|^p·exp(-k²l²)` with `L = V²/g`.
/// The DC term is zero.
pub fn phillips(params: &SpectrumParams, k: [f64; 2]) -> f64 {
    let k_sq = k[0] * k[0] + k[1] * k[1];
    if k_sq < 1e-12 {
        return 0.0;
    }
    let k_len = k_sq.sqrt();
    let largest_wave = params.wind_speed * params.wind_speed / params.gravity;
    if largest_wave <= 0.0 {
        return 0.0;
    }

    let wind = params.wind_unit();
    let k_dot_w = (k[0] * wind[0] + k[1] * wind[1]) / k_len;

    let mut p = params.amplitude * (-1.0 / (k_sq * largest_wave * largest_wave)).exp() / (k_sq * k_sq);
    p *= k_dot_w.abs().powi(params.directional_exponent);
    if k_dot_w < 0.0 {
        p *= params.opposing_wave_factor;
    }
    let cutoff = params.small_wave_cutoff;
    p * (-k_sq * cutoff * cutoff).exp()
}

/// Seeded initial amplitudes and per-mode angular frequencies
#[derive(Clone, Debug)]
pub struct WaveSpectrum {
    params: SpectrumParams,
    /// `h0(k)`
    initial: Vec<Complex>,
    /// `conj(h0(-k))`, cached so evaluation is a single pass
    initial_mirror: Vec<Complex>,
    /// `ω(k)`
    frequency: Vec<f64>,
}

impl WaveSpectrum {
    /// Build the spectrum for the given parameters
    pub fn new(params: SpectrumParams) -> Result<Self, SpectralError> {
        params.validate()?;
        let n = params.grid_size;
        let mut rng = SplitMix64::new(params.seed);

        let mut initial = Vec::with_capacity(n * n);
        let mut frequency = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let k = params.wavevector(row, col);
                let (xi_r, xi_i) = rng.next_gaussian_pair();
                let amplitude = (phillips(&params, k) * 0.5).sqrt();
                initial.push(Complex::new(xi_r, xi_i).scale(amplitude));
                frequency.push((params.gravity * k[0].hypot(k[1])).sqrt());
            }
        }

        let initial_mirror = (0..n * n)
            .map(|i| {
                let (row, col) = (i / n, i % n);
                initial[mirror(row, n) * n + mirror(col, n)].conj()
            })
            .collect();

        log::debug!(
            "Built {}x{} wave spectrum (patch {} m, wind {} m/s)",
            n,
            n,
            params.patch_length,
            params.wind_speed
        );

        Ok(Self {
            params,
            initial,
            initial_mirror,
            frequency,
        })
    }

    /// Parameters this spectrum was built from
    pub fn params(&self) -> &SpectrumParams {
        &self.params
    }

    /// Samples per side
    pub fn grid_size(&self) -> usize {
        self.params.grid_size
    }

    /// Initial amplitudes `h0(k)` in grid order
    pub fn initial_amplitudes(&self) -> &[Complex] {
        &self.initial
    }

    /// Write `h(k, t) = h0(k)e^{iωt} + conj(h0(-k))e^{-iωt}` into `out`
    ///
    /// The result is Hermitian, so its inverse transform is real up to
    /// rounding.
    pub fn evaluate(&self, time: f64, out: &mut [Complex]) -> Result<(), SpectralError> {
        if out.len() != self.initial.len() {
            return Err(SpectralError::LengthMismatch {
                expected: self.initial.len(),
                actual: out.len(),
            });
        }
        for (((slot, &h0), &h0_mirror), &omega) in out
            .iter_mut()
            .zip(&self.initial)
            .zip(&self.initial_mirror)
            .zip(&self.frequency)
        {
            let phase = Complex::cis(omega * time);
            *slot = h0 * phase + h0_mirror * phase.conj();
        }
        Ok(())
    }
}

/// Index of `-k` along one axis
#[inline]
fn mirror(i: usize, n: usize) -> usize {
    (n - i) % n
}
