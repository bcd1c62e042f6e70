use nozzle_core::constraint::{Constrained, StrictlyPositive};
use uom::si::{f64::Length, length::meter};

use crate::{ParamsError, area_mach};

/// Specific heat ratio of the combustion products.
pub const DEFAULT_HEAT_CAPACITY_RATIO: f64 = 1.25;

/// Reference (throat) diameter in meters.
pub const DEFAULT_THROAT_DIAMETER_M: f64 = 0.1517;

/// A strictly positive diameter.
pub type Diameter = Constrained<Length, StrictlyPositive>;

/// Builds a [`Diameter`] from a value in meters.
///
/// # Errors
///
/// Returns [`ParamsError::Diameter`] if the value is zero, negative, or NaN.
pub fn diameter(meters: f64) -> Result<Diameter, ParamsError> {
    StrictlyPositive::new(Length::new::<meter>(meters)).map_err(ParamsError::Diameter)
}

/// Fixed parameters of the area-Mach equation.
///
/// The defaults are [`DEFAULT_HEAT_CAPACITY_RATIO`] and
/// [`DEFAULT_THROAT_DIAMETER_M`]; both can be overridden through [`NozzleParams::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzleParams {
    heat_capacity_ratio: f64,
    throat_diameter: Length,
}

impl Default for NozzleParams {
    fn default() -> Self {
        Self {
            heat_capacity_ratio: DEFAULT_HEAT_CAPACITY_RATIO,
            throat_diameter: Length::new::<meter>(DEFAULT_THROAT_DIAMETER_M),
        }
    }
}

impl NozzleParams {
    /// Creates parameters from a specific heat ratio `k` and throat diameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError::HeatCapacityRatio`] unless `k` is finite and
    /// greater than one.
    pub fn new(heat_capacity_ratio: f64, throat_diameter: Diameter) -> Result<Self, ParamsError> {
        if !heat_capacity_ratio.is_finite() || heat_capacity_ratio <= 1.0 {
            return Err(ParamsError::HeatCapacityRatio(heat_capacity_ratio));
        }
        Ok(Self {
            heat_capacity_ratio,
            throat_diameter: throat_diameter.into_inner(),
        })
    }

    #[must_use]
    pub fn heat_capacity_ratio(&self) -> f64 {
        self.heat_capacity_ratio
    }

    #[must_use]
    pub fn throat_diameter(&self) -> Length {
        self.throat_diameter
    }

    /// Left side of the equation, `A*/A` at `mach`.
    #[must_use]
    pub fn area_ratio(&self, mach: f64) -> f64 {
        area_mach::area_ratio(mach, self.heat_capacity_ratio)
    }

    /// Right side of the equation, `(d_star / d_i)²`.
    #[must_use]
    pub fn target_ratio(&self, local: &Diameter) -> f64 {
        area_mach::target_ratio(self.throat_diameter, *local.as_ref())
    }

    /// Signed residual `area_ratio(mach) - target_ratio(local)`.
    #[must_use]
    pub fn residual(&self, mach: f64, local: &Diameter) -> f64 {
        self.area_ratio(mach) - self.target_ratio(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nozzle_core::constraint::ConstraintError;
    use uom::si::length::millimeter;

    #[test]
    fn rejects_non_positive_diameters() {
        assert_eq!(
            diameter(0.0),
            Err(ParamsError::Diameter(ConstraintError::Zero))
        );
        assert_eq!(
            diameter(-0.2),
            Err(ParamsError::Diameter(ConstraintError::Negative))
        );
        assert!(diameter(f64::NAN).is_err());
    }

    #[test]
    fn rejects_heat_capacity_ratio_at_or_below_one() {
        let throat = diameter(0.1517).unwrap();
        assert_eq!(
            NozzleParams::new(1.0, throat),
            Err(ParamsError::HeatCapacityRatio(1.0))
        );
        assert!(NozzleParams::new(0.8, throat).is_err());
        assert!(NozzleParams::new(f64::INFINITY, throat).is_err());
    }

    #[test]
    fn default_matches_explicit_construction() {
        let explicit = NozzleParams::new(1.25, diameter(0.1517).unwrap()).unwrap();
        assert_eq!(NozzleParams::default(), explicit);
        assert_relative_eq!(explicit.throat_diameter().get::<millimeter>(), 151.7);
    }

    #[test]
    fn target_ratio_for_reference_case() {
        let params = NozzleParams::default();
        let local = diameter(0.2).unwrap();

        // (0.1517 / 0.2)² = 0.7585² exactly.
        assert_relative_eq!(params.target_ratio(&local), 0.575_322_25, epsilon = 1e-12);
        assert_eq!(format!("{:.6}", params.target_ratio(&local)), "0.575322");
    }

    #[test]
    fn residual_is_left_minus_right() {
        let params = NozzleParams::default();
        let local = diameter(0.2).unwrap();

        // A*/A peaks at exactly 1 for sonic flow.
        assert_relative_eq!(params.residual(1.0, &local), 1.0 - 0.575_322_25, epsilon = 1e-12);
    }
}
