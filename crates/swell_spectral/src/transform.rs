//! Discrete Fourier transforms
//!
//! Two families with identical conventions:
//! - [`dft`]/[`idft`]: direct O(n²) evaluation for any length
//! - [`fft`]/[`ifft`]: radix-2 Cooley-Tukey, O(n log n), power-of-two lengths only
//!
//! Forward transforms are unscaled, `X[k] = Σ x[j]·e^{-2πi·jk/n}`. Inverse
//! transforms carry the `1/n` factor so `ifft(fft(x)) == x`.
//!
//! The fast path is iterative: a bit-reversal permutation followed by in-place
//! butterfly passes. [`FftPlan`] precomputes the twiddles and permutation so
//! repeated transforms of the same size do not allocate.

use std::f64::consts::PI;

use swell_math::Complex;

use crate::error::SpectralError;

/// Direct discrete Fourier transform
pub fn dft(signal: &[Complex]) -> Result<Vec<Complex>, SpectralError> {
    direct(signal, -1.0)
}

/// Inverse of [`dft`]
pub fn idft(spectrum: &[Complex]) -> Result<Vec<Complex>, SpectralError> {
    let mut out = direct(spectrum, 1.0)?;
    let scale = 1.0 / out.len() as f64;
    for v in out.iter_mut() {
        *v = v.scale(scale);
    }
    Ok(out)
}

/// Fast Fourier transform of a power-of-two length signal
///
/// Non-power-of-two lengths are rejected rather than routed through [`dft`].
pub fn fft(signal: &[Complex]) -> Result<Vec<Complex>, SpectralError> {
    let plan = FftPlan::new(signal.len())?;
    let mut out = signal.to_vec();
    plan.forward(&mut out)?;
    Ok(out)
}

/// Inverse of [`fft`]
pub fn ifft(spectrum: &[Complex]) -> Result<Vec<Complex>, SpectralError> {
    let plan = FftPlan::new(spectrum.len())?;
    let mut out = spectrum.to_vec();
    plan.inverse(&mut out)?;
    Ok(out)
}

/// O(n²) evaluation of `Σ_j x[j]·e^{sign·2πi·jk/n}` without normalization
fn direct(input: &[Complex], sign: f64) -> Result<Vec<Complex>, SpectralError> {
    let n = input.len();
    if n == 0 {
        return Err(SpectralError::Empty);
    }

    let step = sign * 2.0 * PI / n as f64;
    let out = (0..n)
        .map(|k| {
            input.iter().enumerate().fold(Complex::ZERO, |acc, (j, &x)| {
                // Reduce jk mod n so the angle stays small for large n
                let angle = step * ((j * k) % n) as f64;
                acc + x * Complex::cis(angle)
            })
        })
        .collect();
    Ok(out)
}

/// Precomputed radix-2 FFT of a fixed length
///
/// Build once per signal size and reuse across frames.
#[derive(Clone, Debug)]
pub struct FftPlan {
    len: usize,
    /// Forward twiddles `e^{-2πi·k/n}` for `k < n/2`
    twiddles: Vec<Complex>,
    /// Bit-reversed index for every position
    bit_reverse: Vec<usize>,
}

impl FftPlan {
    /// Create a plan for signals of exactly `len` samples
    pub fn new(len: usize) -> Result<Self, SpectralError> {
        if len == 0 {
            return Err(SpectralError::Empty);
        }
        if !len.is_power_of_two() {
            return Err(SpectralError::NonPowerOfTwo(len));
        }

        let twiddles = (0..len / 2)
            .map(|k| Complex::cis(-2.0 * PI * k as f64 / len as f64))
            .collect();

        let bits = len.trailing_zeros();
        let bit_reverse = (0..len)
            .map(|i| if bits == 0 { 0 } else { i.reverse_bits() >> (usize::BITS - bits) })
            .collect();

        log::debug!("Built FFT plan for {} samples", len);

        Ok(Self {
            len,
            twiddles,
            bit_reverse,
        })
    }

    /// Signal length this plan transforms
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; plans are never built for empty signals
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forward transform in place
    pub fn forward(&self, data: &mut [Complex]) -> Result<(), SpectralError> {
        self.check_len(data.len(), self.len)?;
        self.butterflies(data, false);
        Ok(())
    }

    /// Inverse transform in place (includes the `1/n` scale)
    pub fn inverse(&self, data: &mut [Complex]) -> Result<(), SpectralError> {
        self.check_len(data.len(), self.len)?;
        self.butterflies(data, true);
        let scale = 1.0 / self.len as f64;
        for v in data.iter_mut() {
            *v = v.scale(scale);
        }
        Ok(())
    }

    /// Forward 2D transform of a row-major `len × len` grid
    ///
    /// `column` is scratch space of exactly `len` samples.
    pub fn forward_2d(&self, grid: &mut [Complex], column: &mut [Complex]) -> Result<(), SpectralError> {
        self.process_2d(grid, column, false)
    }

    /// Inverse 2D transform of a row-major `len × len` grid
    ///
    /// The result is scaled by `1/len²`.
    pub fn inverse_2d(&self, grid: &mut [Complex], column: &mut [Complex]) -> Result<(), SpectralError> {
        self.process_2d(grid, column, true)
    }

    fn process_2d(
        &self,
        grid: &mut [Complex],
        column: &mut [Complex],
        inverse: bool,
    ) -> Result<(), SpectralError> {
        let n = self.len;
        self.check_len(grid.len(), n * n)?;
        self.check_len(column.len(), n)?;

        let transform = |buf: &mut [Complex]| {
            if inverse {
                self.inverse(buf)
            } else {
                self.forward(buf)
            }
        };

        for row in grid.chunks_exact_mut(n) {
            transform(row)?;
        }

        for col in 0..n {
            for (row, slot) in column.iter_mut().enumerate() {
                *slot = grid[row * n + col];
            }
            transform(column)?;
            for (row, value) in column.iter().enumerate() {
                grid[row * n + col] = *value;
            }
        }

        Ok(())
    }

    fn check_len(&self, actual: usize, expected: usize) -> Result<(), SpectralError> {
        if actual != expected {
            return Err(SpectralError::LengthMismatch { expected, actual });
        }
        Ok(())
    }

    fn butterflies(&self, data: &mut [Complex], inverse: bool) {
        let n = self.len;

        for (i, &rev) in self.bit_reverse.iter().enumerate() {
            if i < rev {
                data.swap(i, rev);
            }
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;
            for start in (0..n).step_by(size) {
                for j in 0..half {
                    let mut w = self.twiddles[j * stride];
                    if inverse {
                        w = w.conj();
                    }
                    let a = data[start + j];
                    let b = data[start + j + half] * w;
                    data[start + j] = a + b;
                    data[start + j + half] = a - b;
                }
            }
            size *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SplitMix64;

    const TOLERANCE: f64 = 1e-5;

    fn random_real_signal(len: usize, seed: u64) -> Vec<Complex> {
        let mut rng = SplitMix64::new(seed);
        (0..len)
            .map(|_| Complex::from_real(rng.next_f64() * 2.0 - 1.0))
            .collect()
    }

    fn assert_close(actual: &[Complex], expected: &[Complex], context: &str) {
        assert_eq!(actual.len(), expected.len(), "{}: length changed", context);
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            let diff = (*a - *e).abs();
            assert!(
                diff <= TOLERANCE,
                "{}: sample {} differs by {} ({:?} vs {:?})",
                context,
                i,
                diff,
                a,
                e
            );
        }
    }

    fn power_of_two_sizes() -> impl Iterator<Item = usize> {
        (1..=8).map(|exp| 1usize << exp)
    }

    #[test]
    fn test_fft_roundtrip_all_sizes() {
        for n in power_of_two_sizes() {
            let signal = random_real_signal(n, n as u64);
            let spectrum = fft(&signal).unwrap();
            assert_eq!(spectrum.len(), n);
            let recovered = ifft(&spectrum).unwrap();
            assert_close(&recovered, &signal, &format!("ifft(fft) n={}", n));
        }
    }

    #[test]
    fn test_dft_roundtrip_all_sizes() {
        for n in power_of_two_sizes() {
            let signal = random_real_signal(n, 1000 + n as u64);
            let spectrum = dft(&signal).unwrap();
            assert_eq!(spectrum.len(), n);
            let recovered = idft(&spectrum).unwrap();
            assert_close(&recovered, &signal, &format!("idft(dft) n={}", n));
        }
    }

    #[test]
    fn test_fft_matches_dft() {
        for n in power_of_two_sizes() {
            let signal = random_real_signal(n, 7 * n as u64);
            let fast = fft(&signal).unwrap();
            let direct = dft(&signal).unwrap();
            assert_close(&fast, &direct, &format!("fft vs dft n={}", n));
            assert_close(
                &ifft(&fast).unwrap(),
                &idft(&direct).unwrap(),
                &format!("ifft vs idft n={}", n),
            );
        }
    }

    #[test]
    fn test_fft_rejects_non_power_of_two() {
        let signal = random_real_signal(6, 3);
        assert_eq!(fft(&signal), Err(SpectralError::NonPowerOfTwo(6)));
        assert_eq!(ifft(&signal), Err(SpectralError::NonPowerOfTwo(6)));
    }

    #[test]
    fn test_dft_accepts_any_length() {
        let signal = random_real_signal(6, 11);
        let recovered = idft(&dft(&signal).unwrap()).unwrap();
        assert_close(&recovered, &signal, "idft(dft) n=6");
    }

    #[test]
    fn test_empty_signal_rejected() {
        assert_eq!(dft(&[]), Err(SpectralError::Empty));
        assert_eq!(idft(&[]), Err(SpectralError::Empty));
        assert_eq!(fft(&[]), Err(SpectralError::Empty));
        assert_eq!(ifft(&[]), Err(SpectralError::Empty));
    }

    #[test]
    fn test_single_sample_is_identity() {
        let signal = [Complex::new(2.5, -1.0)];
        assert_eq!(fft(&signal).unwrap(), signal.to_vec());
        assert_eq!(dft(&signal).unwrap(), signal.to_vec());
    }

    #[test]
    fn test_impulse_has_flat_spectrum() {
        let mut signal = vec![Complex::ZERO; 16];
        signal[0] = Complex::ONE;
        let spectrum = fft(&signal).unwrap();
        assert_close(&spectrum, &vec![Complex::ONE; 16], "impulse spectrum");
    }

    #[test]
    fn test_plan_rejects_wrong_length() {
        let plan = FftPlan::new(8).unwrap();
        let mut data = vec![Complex::ZERO; 4];
        assert_eq!(
            plan.forward(&mut data),
            Err(SpectralError::LengthMismatch { expected: 8, actual: 4 })
        );
    }

    #[test]
    fn test_plan_reuse_is_stable() {
        let plan = FftPlan::new(32).unwrap();
        let signal = random_real_signal(32, 99);
        let mut a = signal.clone();
        let mut b = signal.clone();
        plan.forward(&mut a).unwrap();
        plan.forward(&mut b).unwrap();
        assert_eq!(a, b);
        plan.inverse(&mut a).unwrap();
        assert_close(&a, &signal, "plan roundtrip");
    }

    #[test]
    fn test_2d_roundtrip() {
        let n = 8;
        let plan = FftPlan::new(n).unwrap();
        let grid = random_real_signal(n * n, 5);
        let mut work = grid.clone();
        let mut column = vec![Complex::ZERO; n];
        plan.forward_2d(&mut work, &mut column).unwrap();
        plan.inverse_2d(&mut work, &mut column).unwrap();
        assert_close(&work, &grid, "2d roundtrip");
    }

    #[test]
    fn test_2d_constant_grid_concentrates_in_dc() {
        let n = 4;
        let plan = FftPlan::new(n).unwrap();
        let mut grid = vec![Complex::ONE; n * n];
        let mut column = vec![Complex::ZERO; n];
        plan.forward_2d(&mut grid, &mut column).unwrap();
        assert!((grid[0].re - 16.0).abs() < TOLERANCE);
        for v in &grid[1..] {
            assert!(v.abs() < TOLERANCE);
        }
    }
}
