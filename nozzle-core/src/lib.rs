//! Core traits and types shared by the nozzle workspace.
//!
//! This crate defines the abstractions that solvers and domain models build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`EquationProblem`]: adapts solver variables to model inputs and
//!   computes residuals from model outputs
//! - [`OdeProblem`]: adapts model inputs and outputs to a [`State`] and its
//!   time derivative for fixed-step integrators
//! - [`constraint`]: numeric invariants checked once at construction

pub mod constraint;

mod model;
mod observer;
mod problems;

pub use model::{Model, Snapshot};
pub use observer::Observer;
pub use problems::{EquationProblem, OdeProblem, State};
