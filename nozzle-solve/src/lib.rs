//! Numerical solvers for nozzle flow problems.
//!
//! The [`equation`] module evaluates [`nozzle_core::EquationProblem`]s against
//! [`nozzle_core::Model`]s and finds roots with bracketed bisection. The
//! [`transient`] module integrates [`nozzle_core::OdeProblem`]s with fixed
//! steps.

pub mod equation;
pub mod transient;
