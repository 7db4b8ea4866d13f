//! Sampled ocean height field
//!
//! Owns the spectrum, an FFT plan and every buffer the per-frame update needs,
//! so [`HeightField::update`] does not allocate.

use swell_math::{Complex, Vec3};

use crate::error::SpectralError;
use crate::spectrum::{SpectrumParams, WaveSpectrum};
use crate::transform::FftPlan;

/// Periodic height field synthesized from a wave spectrum
pub struct HeightField {
    spectrum: WaveSpectrum,
    plan: FftPlan,
    /// Spectrum at the current time, then transformed in place
    work: Vec<Complex>,
    /// Column scratch for the 2D transform
    column: Vec<Complex>,
    /// Heights, row-major (rows along z, columns along x)
    heights: Vec<f32>,
    time: f64,
}

impl HeightField {
    /// Create a field and synthesize it at `t = 0`
    pub fn new(params: SpectrumParams) -> Result<Self, SpectralError> {
        let spectrum = WaveSpectrum::new(params)?;
        let n = spectrum.grid_size();
        let plan = FftPlan::new(n)?;

        let mut field = Self {
            spectrum,
            plan,
            work: vec![Complex::ZERO; n * n],
            column: vec![Complex::ZERO; n],
            heights: vec![0.0; n * n],
            time: 0.0,
        };
        field.update(0.0)?;
        Ok(field)
    }

    /// Samples per side
    pub fn grid_size(&self) -> usize {
        self.spectrum.grid_size()
    }

    /// World-space side length of one tile
    pub fn patch_length(&self) -> f32 {
        self.spectrum.params().patch_length as f32
    }

    /// Distance between neighbouring samples
    pub fn cell_size(&self) -> f32 {
        self.patch_length() / self.grid_size() as f32
    }

    /// Time of the last update
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Raw heights in row-major order
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// The spectrum driving this field
    pub fn spectrum(&self) -> &WaveSpectrum {
        &self.spectrum
    }

    /// Re-synthesize the field at absolute time `time` (seconds)
    pub fn update(&mut self, time: f64) -> Result<(), SpectralError> {
        self.spectrum.evaluate(time, &mut self.work)?;
        self.plan.inverse_2d(&mut self.work, &mut self.column)?;

        // The inverse carries 1/N²; the ocean sum is unnormalized
        let n = self.grid_size();
        let scale = (n * n) as f64;
        for (h, c) in self.heights.iter_mut().zip(&self.work) {
            *h = (c.re() * scale) as f32;
        }

        self.time = time;
        log::trace!("Height field updated to t = {:.3}", time);
        Ok(())
    }

    /// Height at grid cell `(row, col)`, wrapping outside the tile
    pub fn sample(&self, row: i64, col: i64) -> f32 {
        let n = self.grid_size() as i64;
        let r = row.rem_euclid(n) as usize;
        let c = col.rem_euclid(n) as usize;
        self.heights[r * n as usize + c]
    }

    /// Bilinearly interpolated height at world position `(x, z)`
    ///
    /// The field tiles periodically in both directions.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let cell = self.cell_size();
        let gx = x / cell;
        let gz = z / cell;
        let col = gx.floor();
        let row = gz.floor();
        let tx = gx - col;
        let tz = gz - row;
        let (col, row) = (col as i64, row as i64);

        let h00 = self.sample(row, col);
        let h01 = self.sample(row, col + 1);
        let h10 = self.sample(row + 1, col);
        let h11 = self.sample(row + 1, col + 1);

        let near = h00 + (h01 - h00) * tx;
        let far = h10 + (h11 - h10) * tx;
        near + (far - near) * tz
    }

    /// Surface normal at `(x, z)` from central differences
    pub fn normal_at(&self, x: f32, z: f32) -> Vec3 {
        let d = self.cell_size();
        let dh_dx = (self.height_at(x + d, z) - self.height_at(x - d, z)) / (2.0 * d);
        let dh_dz = (self.height_at(x, z + d) - self.height_at(x, z - d)) / (2.0 * d);
        Vec3::new(-dh_dx, 1.0, -dh_dz).normalized()
    }
}
