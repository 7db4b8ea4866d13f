//! Numerical integrators over flat state buffers
//!
//! The integrator is chosen once when the simulation is set up
//! ([`Integrator::new`]) and then applied to the whole shared state buffer
//! every step.
//!
//! # Aliasing
//!
//! [`euler`] writes `out[i] = x[i] + dxdt[i]·dt` and is safe to run in place;
//! [`euler_in_place`] is that aliased form. [`Rk4`] re-evaluates the
//! derivative at intermediate states read from `x`, so its output must be a
//! distinct buffer. The `&mut`/`&` signatures make misuse a compile error.

use serde::{Deserialize, Serialize};
use swell_math::linalg;

use crate::error::StateError;

/// Something whose time derivative can be evaluated at an arbitrary state
pub trait Dynamics {
    /// Write `d(state)/dt` into `out` (same length as `state`)
    fn derivative(&mut self, out: &mut [f32], state: &[f32]) -> Result<(), StateError>;
}

/// Available integration strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    /// First-order explicit Euler
    #[default]
    Euler,
    /// Classic fourth-order Runge-Kutta
    Rk4,
}

/// Explicit Euler step: `out[i] = x[i] + dxdt[i]·dt`
#[inline]
pub fn euler(out: &mut [f32], x: &[f32], dxdt: &[f32], dt: f32) {
    linalg::axpy(out, x, dxdt, dt);
}

/// Explicit Euler step written back into `x`
#[inline]
pub fn euler_in_place(x: &mut [f32], dxdt: &[f32], dt: f32) {
    linalg::axpy_in_place(x, dxdt, dt);
}

/// Fourth-order Runge-Kutta with pre-allocated stage buffers
///
/// Does not support `out` aliasing `x`.
#[derive(Clone, Debug, Default)]
pub struct Rk4 {
    k2: Vec<f32>,
    k3: Vec<f32>,
    k4: Vec<f32>,
    probe: Vec<f32>,
}

impl Rk4 {
    /// Create an integrator sized for `len` state floats
    pub fn new(len: usize) -> Self {
        let mut rk4 = Self::default();
        rk4.resize(len);
        rk4
    }

    /// Number of state floats the stage buffers hold
    pub fn len(&self) -> usize {
        self.probe.len()
    }

    /// Whether the stage buffers are empty
    pub fn is_empty(&self) -> bool {
        self.probe.is_empty()
    }

    /// Resize the stage buffers (call when the state layout changes)
    pub fn resize(&mut self, len: usize) {
        self.k2.resize(len, 0.0);
        self.k3.resize(len, 0.0);
        self.k4.resize(len, 0.0);
        self.probe.resize(len, 0.0);
    }

    /// Advance `x` by `dt` into `out`, with `dxdt` the derivative at `x`
    pub fn integrate(
        &mut self,
        out: &mut [f32],
        x: &[f32],
        dxdt: &[f32],
        dt: f32,
        dynamics: &mut dyn Dynamics,
    ) -> Result<(), StateError> {
        if self.len() != x.len() {
            log::debug!("Resizing RK4 stage buffers from {} to {}", self.len(), x.len());
            self.resize(x.len());
        }
        let half = dt * 0.5;

        linalg::axpy(&mut self.probe, x, dxdt, half);
        dynamics.derivative(&mut self.k2, &self.probe)?;

        linalg::axpy(&mut self.probe, x, &self.k2, half);
        dynamics.derivative(&mut self.k3, &self.probe)?;

        linalg::axpy(&mut self.probe, x, &self.k3, dt);
        dynamics.derivative(&mut self.k4, &self.probe)?;

        // k1 + 2·k2 + 2·k3 + k4
        linalg::combine2(&mut self.probe, &self.k2, 2.0, &self.k3, 2.0);
        linalg::axpy_in_place(&mut self.probe, dxdt, 1.0);
        linalg::axpy_in_place(&mut self.probe, &self.k4, 1.0);

        linalg::axpy(out, x, &self.probe, dt / 6.0);
        Ok(())
    }
}

/// Integrator selected at simulation setup
#[derive(Clone, Debug)]
pub enum Integrator {
    Euler,
    Rk4(Rk4),
}

impl Integrator {
    /// Build the integrator for `kind`, sizing scratch for `state_len` floats
    pub fn new(kind: IntegratorKind, state_len: usize) -> Self {
        match kind {
            IntegratorKind::Euler => Integrator::Euler,
            IntegratorKind::Rk4 => Integrator::Rk4(Rk4::new(state_len)),
        }
    }

    /// Which strategy this is
    pub fn kind(&self) -> IntegratorKind {
        match self {
            Integrator::Euler => IntegratorKind::Euler,
            Integrator::Rk4(_) => IntegratorKind::Rk4,
        }
    }

    /// Resize any scratch space for a new state length
    pub fn resize(&mut self, state_len: usize) {
        if let Integrator::Rk4(rk4) = self {
            rk4.resize(state_len);
        }
    }

    /// Advance the full state buffer `x` by `dt` into `out`
    ///
    /// `dynamics` is only consulted by strategies that need derivatives at
    /// intermediate states.
    pub fn integrate(
        &mut self,
        out: &mut [f32],
        x: &[f32],
        dxdt: &[f32],
        dt: f32,
        dynamics: &mut dyn Dynamics,
    ) -> Result<(), StateError> {
        check_len(out.len(), x.len())?;
        check_len(dxdt.len(), x.len())?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(StateError::InvalidTimeStep(dt));
        }

        match self {
            Integrator::Euler => {
                euler(out, x, dxdt, dt);
                Ok(())
            }
            Integrator::Rk4(rk4) => rk4.integrate(out, x, dxdt, dt, dynamics),
        }
    }
}

fn check_len(actual: usize, expected: usize) -> Result<(), StateError> {
    if actual != expected {
        return Err(StateError::LengthMismatch { expected, actual });
    }
    Ok(())
}
