use std::{fs, path::Path};

use serde::Deserialize;

use nozzle_gas::{
    DEFAULT_HEAT_CAPACITY_RATIO, DEFAULT_THROAT_DIAMETER_M, NozzleParams, RootFinder,
    RootFinderConfig, diameter,
    trajectory::{AlphaLaw, FlightConfig, Vehicle},
};
use nozzle_solve::{
    equation::bisection::{Candidates, Config, DEFAULT_INNER_BOUNDS, DEFAULT_OUTER_BOUNDS},
    transient::Method,
};
use uom::si::{
    angle::degree,
    angular_velocity::degree_per_second,
    area::square_meter,
    f64::{Angle, AngularVelocity, Area, Length, Mass, MassRate, Time, Velocity},
    length::meter,
    mass::kilogram,
    mass_rate::kilogram_per_second,
    time::second,
    velocity::meter_per_second,
};

use crate::CliError;

/// Settings read from a TOML file.
///
/// Every field is optional; anything left out keeps its built-in default.
///
/// ```toml
/// heat_capacity_ratio = 1.25
/// throat_diameter_m = 0.1517
/// intervals = [[0.01, 0.99], [1.01, 10.0]]
///
/// [bisection]
/// max_iters = 1000
///
/// [fallback]
/// outer = [0.1, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 10.0]
/// inner = [0.01, 0.05, 0.1]
///
/// [trajectory]
/// method = "rk4"
/// initial_mass_kg = 1255.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub heat_capacity_ratio: Option<f64>,
    pub throat_diameter_m: Option<f64>,
    pub intervals: Option<Vec<[f64; 2]>>,
    pub duplicate_tol: Option<f64>,
    pub accept_tol: Option<f64>,
    pub bisection: BisectionSection,
    pub fallback: FallbackSection,
    pub trajectory: TrajectorySection,
}

/// The `[bisection]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BisectionSection {
    pub max_iters: Option<usize>,
    pub x_tol: Option<f64>,
    pub residual_tol: Option<f64>,
}

/// The `[fallback]` table.
///
/// Either an explicit ordered `brackets` list, or a grid of `outer` × `inner`
/// bounds. Explicit brackets win when both are given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackSection {
    pub brackets: Option<Vec<[f64; 2]>>,
    pub outer: Option<Vec<f64>>,
    pub inner: Option<Vec<f64>>,
}

/// The `[trajectory]` table: integration settings and the vehicle.
///
/// `pitch_deg` defaults to `flight_path_angle_deg` when only the latter is
/// given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrajectorySection {
    pub method: Option<String>,
    pub alpha: Option<String>,
    pub dt_s: Option<f64>,
    pub initial_speed_m_s: Option<f64>,
    pub flight_path_angle_deg: Option<f64>,
    pub pitch_deg: Option<f64>,
    pub pitch_rate_deg_s: Option<f64>,
    pub initial_altitude_m: Option<f64>,
    pub initial_mass_kg: Option<f64>,
    pub mass_flow_kg_s: Option<f64>,
    pub exhaust_velocity_m_s: Option<f64>,
    pub reference_area_m2: Option<f64>,
    pub burn_time_s: Option<f64>,
}

impl FileConfig {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ReadConfig`] or [`CliError::ParseConfig`].
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds equation parameters, letting explicit values override the file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Params`] if `k` or the throat diameter is invalid.
    pub fn params(
        &self,
        heat_capacity_ratio: Option<f64>,
        throat_diameter_m: Option<f64>,
    ) -> Result<NozzleParams, CliError> {
        let k = heat_capacity_ratio
            .or(self.heat_capacity_ratio)
            .unwrap_or(DEFAULT_HEAT_CAPACITY_RATIO);
        let throat = throat_diameter_m
            .or(self.throat_diameter_m)
            .unwrap_or(DEFAULT_THROAT_DIAMETER_M);

        Ok(NozzleParams::new(k, diameter(throat)?)?)
    }

    /// Builds the root-scan settings.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Fallback`] for a malformed fallback bracket.
    pub fn finder_config(&self) -> Result<RootFinderConfig, CliError> {
        let defaults = RootFinderConfig::default();
        let bisection = Config {
            max_iters: self
                .bisection
                .max_iters
                .unwrap_or(defaults.bisection.max_iters),
            x_tol: self.bisection.x_tol.unwrap_or(defaults.bisection.x_tol),
            residual_tol: self
                .bisection
                .residual_tol
                .unwrap_or(defaults.bisection.residual_tol),
        };

        Ok(RootFinderConfig {
            intervals: self.intervals.clone().unwrap_or(defaults.intervals),
            candidates: self.fallback.candidates()?,
            bisection,
            duplicate_tol: self.duplicate_tol.unwrap_or(defaults.duplicate_tol),
            accept_tol: self.accept_tol.unwrap_or(defaults.accept_tol),
        })
    }

    /// Builds a validated [`RootFinder`].
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters or settings do not validate.
    pub fn finder(
        &self,
        heat_capacity_ratio: Option<f64>,
        throat_diameter_m: Option<f64>,
    ) -> Result<RootFinder, CliError> {
        let params = self.params(heat_capacity_ratio, throat_diameter_m)?;
        Ok(RootFinder::new(params, self.finder_config()?)?)
    }
}

impl TrajectorySection {
    /// Builds the vehicle, keeping defaults for fields left out.
    ///
    /// Values are checked when the flight is simulated.
    #[must_use]
    pub fn vehicle(&self) -> Vehicle {
        let defaults = Vehicle::default();
        let path_angle = self
            .flight_path_angle_deg
            .map_or(defaults.flight_path_angle, Angle::new::<degree>);

        Vehicle {
            initial_speed: self
                .initial_speed_m_s
                .map_or(defaults.initial_speed, Velocity::new::<meter_per_second>),
            flight_path_angle: path_angle,
            pitch: self.pitch_deg.map_or(
                if self.flight_path_angle_deg.is_some() {
                    path_angle
                } else {
                    defaults.pitch
                },
                Angle::new::<degree>,
            ),
            pitch_rate: self
                .pitch_rate_deg_s
                .map_or(defaults.pitch_rate, AngularVelocity::new::<degree_per_second>),
            initial_altitude: self
                .initial_altitude_m
                .map_or(defaults.initial_altitude, Length::new::<meter>),
            initial_mass: self
                .initial_mass_kg
                .map_or(defaults.initial_mass, Mass::new::<kilogram>),
            mass_flow: self
                .mass_flow_kg_s
                .map_or(defaults.mass_flow, MassRate::new::<kilogram_per_second>),
            exhaust_velocity: self
                .exhaust_velocity_m_s
                .map_or(defaults.exhaust_velocity, Velocity::new::<meter_per_second>),
            reference_area: self
                .reference_area_m2
                .map_or(defaults.reference_area, Area::new::<square_meter>),
            burn_time: self
                .burn_time_s
                .map_or(defaults.burn_time, Time::new::<second>),
        }
    }

    /// Builds the integration settings, letting explicit values override the
    /// file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Method`] or [`CliError::AlphaLaw`] for an unknown
    /// name in the file.
    pub fn flight_config(
        &self,
        method: Option<Method>,
        law: Option<AlphaLaw>,
        dt: Option<f64>,
    ) -> Result<FlightConfig, CliError> {
        let defaults = FlightConfig::default();
        let method = match (method, &self.method) {
            (Some(method), _) => method,
            (None, Some(name)) => name.parse()?,
            (None, None) => defaults.method,
        };
        let law = match (law, &self.alpha) {
            (Some(law), _) => law,
            (None, Some(name)) => name.parse()?,
            (None, None) => defaults.law,
        };

        Ok(FlightConfig {
            method,
            law,
            dt: dt.or(self.dt_s).unwrap_or(defaults.dt),
        })
    }
}

impl FallbackSection {
    fn candidates(&self) -> Result<Candidates, CliError> {
        if let Some(brackets) = &self.brackets {
            return Ok(Candidates::new(brackets.iter().copied())?);
        }
        if self.outer.is_none() && self.inner.is_none() {
            return Ok(Candidates::default());
        }

        let outer = self.outer.as_deref().unwrap_or(&DEFAULT_OUTER_BOUNDS[..]);
        let inner = self.inner.as_deref().unwrap_or(&DEFAULT_INNER_BOUNDS[..]);
        Ok(Candidates::grid(outer, inner)?)
    }
}
