//! Standard atmosphere properties in the troposphere.
//!
//! Valid for geometric altitudes from sea level to 11 km, where temperature
//! falls linearly with geopotential height.

use thiserror::Error;
use uom::si::{
    acceleration::meter_per_second_squared,
    f64::{Acceleration, Length, MassDensity, Pressure, ThermodynamicTemperature, Velocity},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

/// Specific gas constant of dry air, J/(kg·K).
const GAS_CONSTANT: f64 = 287.052_87;

/// Standard gravity at sea level, m/s².
const STANDARD_GRAVITY: f64 = 9.806_65;

/// Sea-level temperature, K.
const SEA_LEVEL_TEMPERATURE: f64 = 288.15;

/// Sea-level pressure, Pa.
const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

/// Earth radius used for geopotential conversion, m.
const EARTH_RADIUS: f64 = 6_356_767.0;

/// Tropospheric temperature lapse rate, K/m.
const LAPSE_RATE: f64 = 0.0065;

/// Heat capacity ratio of air.
const AIR_HEAT_CAPACITY_RATIO: f64 = 1.4;

/// Upper edge of the troposphere (geometric altitude), m.
pub const TROPOPAUSE_ALTITUDE_M: f64 = 11_000.0;

/// Errors raised for altitudes outside the modeled layer.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AtmosphereError {
    #[error("altitude must not be negative, got {0} m")]
    Negative(f64),

    #[error("altitude {0} m is above the troposphere (11000 m)")]
    AboveTroposphere(f64),

    #[error("altitude is not finite")]
    NonFinite,
}

/// Atmospheric state at one altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub geopotential_height: Length,
    pub gravity: Acceleration,
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub density: MassDensity,
    pub speed_of_sound: Velocity,
}

/// Computes standard-atmosphere properties at a geometric `altitude`.
///
/// # Errors
///
/// Returns an [`AtmosphereError`] if the altitude is negative, non-finite,
/// or above [`TROPOPAUSE_ALTITUDE_M`].
pub fn atmosphere(altitude: Length) -> Result<Atmosphere, AtmosphereError> {
    let h = altitude.get::<meter>();
    if !h.is_finite() {
        return Err(AtmosphereError::NonFinite);
    }
    if h < 0.0 {
        return Err(AtmosphereError::Negative(h));
    }
    if h > TROPOPAUSE_ALTITUDE_M {
        return Err(AtmosphereError::AboveTroposphere(h));
    }

    let geopotential = EARTH_RADIUS * h / (EARTH_RADIUS + h);
    let gravity = STANDARD_GRAVITY * (EARTH_RADIUS / (EARTH_RADIUS + h)).powi(2);
    let temperature = SEA_LEVEL_TEMPERATURE - LAPSE_RATE * geopotential;
    let pressure = SEA_LEVEL_PRESSURE
        * (temperature / SEA_LEVEL_TEMPERATURE)
            .powf(STANDARD_GRAVITY / (LAPSE_RATE * GAS_CONSTANT));
    let density = pressure / (GAS_CONSTANT * temperature);
    let speed_of_sound = (AIR_HEAT_CAPACITY_RATIO * GAS_CONSTANT * temperature).sqrt();

    Ok(Atmosphere {
        geopotential_height: Length::new::<meter>(geopotential),
        gravity: Acceleration::new::<meter_per_second_squared>(gravity),
        temperature: ThermodynamicTemperature::new::<kelvin>(temperature),
        pressure: Pressure::new::<pascal>(pressure),
        density: MassDensity::new::<kilogram_per_cubic_meter>(density),
        speed_of_sound: Velocity::new::<meter_per_second>(speed_of_sound),
    })
}
