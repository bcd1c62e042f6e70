//! The isentropic area-Mach relation.
//!
//! For a calorically perfect gas with specific heat ratio `k`, the ratio of
//! throat area to local area at Mach `M` is
//!
//! ```text
//! A*/A = M · ((k+1)/2)^((k+1)/(2(k-1))) · (1 + (k-1)/2 · M²)^(−(k+1)/(2(k-1)))
//! ```
//!
//! It rises from zero at `M = 0` to exactly one at `M = 1` and decays again
//! for supersonic flow, so any ratio in `(0, 1)` has one subsonic and one
//! supersonic solution.

use std::convert::Infallible;

use nozzle_core::{EquationProblem, Model};
use uom::si::{
    f64::{Length, Ratio},
    ratio::ratio,
};

use crate::MachError;

/// Returns `A*/A` at `mach` for specific heat ratio `k`.
///
/// `k` must be greater than one; callers go through
/// [`NozzleParams`](crate::NozzleParams), which enforces it.
#[must_use]
pub fn area_ratio(mach: f64, k: f64) -> f64 {
    let exponent = (k + 1.0) / (2.0 * (k - 1.0));
    let throat_term = ((k + 1.0) / 2.0).powf(exponent);
    let flow_term = (1.0 + 0.5 * (k - 1.0) * mach * mach).powf(-exponent);
    mach * throat_term * flow_term
}

/// Returns `(throat / local)²`, the area ratio implied by two diameters.
#[must_use]
pub fn target_ratio(throat: Length, local: Length) -> f64 {
    let diameter_ratio: Ratio = throat / local;
    diameter_ratio.get::<ratio>().powi(2)
}

/// Maps a Mach number to the area ratio `A*/A`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaMachModel {
    heat_capacity_ratio: f64,
}

impl AreaMachModel {
    #[must_use]
    pub fn new(heat_capacity_ratio: f64) -> Self {
        Self {
            heat_capacity_ratio,
        }
    }
}

impl Model for AreaMachModel {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, mach: &f64) -> Result<f64, Infallible> {
        Ok(area_ratio(*mach, self.heat_capacity_ratio))
    }
}

/// Drives the area ratio to the value implied by a diameter pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiameterProblem {
    target: f64,
}

impl DiameterProblem {
    /// Creates a problem whose residual is `A*/A - target`.
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self { target }
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }
}

impl EquationProblem<1> for DiameterProblem {
    type Input = f64;
    type Output = f64;
    type InputError = MachError;
    type ResidualError = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<f64, MachError> {
        let mach = x[0];
        if !mach.is_finite() {
            return Err(MachError::NonFinite);
        }
        if mach < 0.0 {
            return Err(MachError::Negative(mach));
        }
        Ok(mach)
    }

    fn residuals(&self, _mach: &f64, area_ratio: &f64) -> Result<[f64; 1], Infallible> {
        Ok([area_ratio - self.target])
    }
}
