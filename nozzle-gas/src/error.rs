use thiserror::Error;

use nozzle_core::constraint::ConstraintError;
use nozzle_solve::equation::bisection::BoundsError;

/// Errors raised when building nozzle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamsError {
    /// The specific heat ratio must be finite and greater than one.
    #[error("heat capacity ratio must be greater than 1, got {0}")]
    HeatCapacityRatio(f64),

    /// A diameter failed its positivity check.
    #[error("invalid diameter")]
    Diameter(#[source] ConstraintError),
}

/// Errors raised when mapping a solver variable to a Mach number.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MachError {
    #[error("Mach number must not be negative, got {0}")]
    Negative(f64),

    #[error("Mach number is not finite")]
    NonFinite,
}

/// Errors raised when validating a [`RootFinderConfig`](crate::RootFinderConfig).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid bisection config: {0}")]
    Bisection(&'static str),

    #[error("`{name}` must be finite and positive, got {value}")]
    Tolerance { name: &'static str, value: f64 },

    #[error("invalid regime interval")]
    Interval(#[source] BoundsError),
}
