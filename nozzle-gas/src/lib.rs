//! Gas-dynamics models for nozzle post-processing.
//!
//! - [`area_mach`]: the isentropic area-Mach relation as a [`nozzle_core::Model`]
//! - [`RootFinder`]: every Mach number matching a given diameter, by regime
//! - [`atmosphere`]: standard-atmosphere properties in the troposphere
//! - [`trajectory`]: powered ascent of a rocket through that atmosphere

mod error;
mod params;
mod regime;
mod roots;

pub mod area_mach;
pub mod atmosphere;
pub mod trajectory;

pub use error::{ConfigError, MachError, ParamsError};
pub use params::{
    DEFAULT_HEAT_CAPACITY_RATIO, DEFAULT_THROAT_DIAMETER_M, Diameter, NozzleParams, diameter,
};
pub use regime::Regime;
pub use roots::{
    DEFAULT_ACCEPT_TOL, DEFAULT_BRACKET, DEFAULT_DUPLICATE_TOL, Rejection, Root, RootFinder,
    RootFinderConfig, RootSet, SUBSONIC_INTERVAL, SUPERSONIC_INTERVAL, ScanEvent,
};
