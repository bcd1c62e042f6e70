use std::{convert::Infallible, fmt, str::FromStr};

use thiserror::Error;
use uom::si::{
    acceleration::meter_per_second_squared, angle::degree, angular_velocity::degree_per_second,
    area::square_meter, f64::Length, length::meter, mass::kilogram,
    mass_density::kilogram_per_cubic_meter, mass_rate::kilogram_per_second,
    velocity::meter_per_second,
};

use nozzle_core::{Model, OdeProblem, State};

use super::{
    Vehicle,
    aero::{MAX_MACH, MIN_MACH, drag_coefficient, lift_slope},
};
use crate::atmosphere::atmosphere;

/// Number of integrated flight variables.
pub const STATE_LEN: usize = 7;

/// The mass used for forces never drops below this fraction of launch mass.
const MIN_MASS_FRACTION: f64 = 0.01;

/// Below this speed, in m/s, the flight path does not turn.
const MIN_TURNING_SPEED: f64 = 1.0;

/// Air assumed where the standard atmosphere has no data.
const FALLBACK_AIR: Air = Air {
    gravity: 9.806_65,
    density: 1.225,
    speed_of_sound: 340.0,
    fallback: true,
};

/// How the angle of attack follows from the flight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaLaw {
    /// `alpha = theta - theta_c`: the body axis leads the flight path.
    #[default]
    PitchMinusPath,
    /// `alpha = 0`: no lift, and thrust acts along the flight path.
    Zero,
}

impl AlphaLaw {
    pub const ALL: [AlphaLaw; 2] = [AlphaLaw::PitchMinusPath, AlphaLaw::Zero];

    /// Angle of attack in radians.
    fn alpha(self, state: &FlightState) -> f64 {
        match self {
            AlphaLaw::PitchMinusPath => (state.pitch - state.path_angle).to_radians(),
            AlphaLaw::Zero => 0.0,
        }
    }
}

impl fmt::Display for AlphaLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlphaLaw::PitchMinusPath => "pitch-minus-path",
            AlphaLaw::Zero => "zero",
        })
    }
}

/// An angle-of-attack law name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown angle-of-attack law `{0}` (expected pitch-minus-path or zero)")]
pub struct ParseAlphaLawError(String);

impl FromStr for AlphaLaw {
    type Err = ParseAlphaLawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pitch-minus-path" | "theta-minus-thetac" => Ok(AlphaLaw::PitchMinusPath),
            "zero" => Ok(AlphaLaw::Zero),
            _ => Err(ParseAlphaLawError(s.to_owned())),
        }
    }
}

/// Point-mass flight state in SI units, with angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    /// s
    pub time: f64,
    /// m/s
    pub speed: f64,
    /// Flight-path angle `theta_c`, degrees above horizontal.
    pub path_angle: f64,
    /// Downrange distance `x`, m.
    pub range: f64,
    /// Altitude `y`, m.
    pub altitude: f64,
    /// Pitch rate `omega_z`, degrees per second.
    pub pitch_rate: f64,
    /// Pitch angle `theta`, degrees.
    pub pitch: f64,
    /// kg
    pub mass: f64,
}

impl FlightState {
    /// The state at launch.
    #[must_use]
    pub fn launch(vehicle: &Vehicle) -> Self {
        Self {
            time: 0.0,
            speed: vehicle.initial_speed.get::<meter_per_second>(),
            path_angle: vehicle.flight_path_angle.get::<degree>(),
            range: 0.0,
            altitude: vehicle.initial_altitude.get::<meter>(),
            pitch_rate: vehicle.pitch_rate.get::<degree_per_second>(),
            pitch: vehicle.pitch.get::<degree>(),
            mass: vehicle.initial_mass.get::<kilogram>(),
        }
    }

    fn to_state(self) -> State<STATE_LEN> {
        State::new(
            self.time,
            [
                self.speed,
                self.path_angle,
                self.range,
                self.altitude,
                self.pitch_rate,
                self.pitch,
                self.mass,
            ],
        )
    }

    fn from_state(state: &State<STATE_LEN>) -> Self {
        let [speed, path_angle, range, altitude, pitch_rate, pitch, mass] = state.y;
        Self {
            time: state.x,
            speed,
            path_angle,
            range,
            altitude,
            pitch_rate,
            pitch,
            mass,
        }
    }
}

/// Forces, coefficients and rates evaluated at a [`FlightState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightRates {
    /// Thrust `P`, N.
    pub thrust: f64,
    /// m/s²
    pub gravity: f64,
    /// Speed over the local speed of sound.
    pub mach: f64,
    pub drag_coefficient: f64,
    /// Lift-curve slope, per radian.
    pub lift_slope: f64,
    /// Angle of attack, degrees.
    pub alpha: f64,
    /// `dV/dt`, m/s².
    pub acceleration: f64,
    /// `d(theta_c)/dt`, degrees per second.
    pub turn_rate: f64,
    /// `dx/dt`, m/s.
    pub range_rate: f64,
    /// `dy/dt`, m/s.
    pub climb_rate: f64,
    /// `dm/dt`, kg/s.
    pub mass_rate: f64,
    /// The altitude was outside the standard atmosphere and fixed sea-level
    /// air stood in for it.
    pub fallback_air: bool,
}

/// Point-mass equations of motion for a rocket in the vertical plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightModel {
    law: AlphaLaw,
    thrust: f64,
    mass_flow: f64,
    reference_area: f64,
    min_mass: f64,
}

impl FlightModel {
    #[must_use]
    pub fn new(vehicle: &Vehicle, law: AlphaLaw) -> Self {
        let mass_flow = vehicle.mass_flow.get::<kilogram_per_second>();
        Self {
            law,
            thrust: mass_flow * vehicle.exhaust_velocity.get::<meter_per_second>(),
            mass_flow,
            reference_area: vehicle.reference_area.get::<square_meter>(),
            min_mass: MIN_MASS_FRACTION * vehicle.initial_mass.get::<kilogram>(),
        }
    }
}

impl Model for FlightModel {
    type Input = FlightState;
    type Output = FlightRates;
    type Error = Infallible;

    fn call(&self, state: &FlightState) -> Result<FlightRates, Infallible> {
        let air = Air::at(state.altitude);
        let mass = state.mass.max(self.min_mass);
        let speed = state.speed;

        let mach = speed / air.speed_of_sound;
        let lookup_mach = mach.clamp(MIN_MACH, MAX_MACH);
        let drag_coefficient = drag_coefficient(lookup_mach);
        let lift_slope = lift_slope(lookup_mach);

        let alpha = self.law.alpha(state);
        let dynamic_pressure = 0.5 * air.density * speed * speed;
        let drag = dynamic_pressure * self.reference_area * drag_coefficient;
        let lift = dynamic_pressure * self.reference_area * lift_slope * alpha;

        let (sin_path, cos_path) = state.path_angle.to_radians().sin_cos();
        let acceleration = (self.thrust * alpha.cos() - drag) / mass - air.gravity * sin_path;
        let turn_rate = if speed > MIN_TURNING_SPEED {
            ((self.thrust * alpha.sin() + lift) / (mass * speed) - air.gravity * cos_path / speed)
                .to_degrees()
        } else {
            0.0
        };

        Ok(FlightRates {
            thrust: self.thrust,
            gravity: air.gravity,
            mach,
            drag_coefficient,
            lift_slope,
            alpha: alpha.to_degrees(),
            acceleration,
            turn_rate,
            range_rate: speed * cos_path,
            climb_rate: speed * sin_path,
            mass_rate: -self.mass_flow,
            fallback_air: air.fallback,
        })
    }
}

/// Maps [`FlightState`] to the integrated variables.
///
/// Every evaluated state keeps a non-negative altitude. Accepted steps also
/// keep a non-negative speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightProblem;

impl OdeProblem<STATE_LEN> for FlightProblem {
    type Input = FlightState;
    type Output = FlightRates;
    type Error = Infallible;

    fn state(&self, input: &FlightState) -> Result<State<STATE_LEN>, Infallible> {
        Ok(input.to_state())
    }

    fn derivative(
        &self,
        input: &FlightState,
        output: &FlightRates,
    ) -> Result<[f64; STATE_LEN], Infallible> {
        Ok([
            output.acceleration,
            output.turn_rate,
            output.range_rate,
            output.climb_rate,
            0.0,
            input.pitch_rate,
            output.mass_rate,
        ])
    }

    fn build_input(
        &self,
        _base: &FlightState,
        state: &State<STATE_LEN>,
    ) -> Result<FlightState, Infallible> {
        let mut next = FlightState::from_state(state);
        next.altitude = next.altitude.max(0.0);
        Ok(next)
    }

    fn finalize_step(&self, next: FlightState) -> Result<FlightState, Infallible> {
        Ok(FlightState {
            speed: next.speed.max(0.0),
            ..next
        })
    }
}

/// Air properties the flight model needs at one altitude, in SI units.
#[derive(Debug, Clone, Copy)]
struct Air {
    gravity: f64,
    density: f64,
    speed_of_sound: f64,
    fallback: bool,
}

impl Air {
    fn at(altitude: f64) -> Self {
        atmosphere(Length::new::<meter>(altitude)).map_or(FALLBACK_AIR, |air| Self {
            gravity: air.gravity.get::<meter_per_second_squared>(),
            density: air.density.get::<kilogram_per_cubic_meter>(),
            speed_of_sound: air.speed_of_sound.get::<meter_per_second>(),
            fallback: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn launch_rates(law: AlphaLaw) -> FlightRates {
        let vehicle = Vehicle::default();
        FlightModel::new(&vehicle, law)
            .call(&FlightState::launch(&vehicle))
            .unwrap()
    }

    #[test]
    fn launch_rates_match_hand_calculation() {
        let rates = launch_rates(AlphaLaw::PitchMinusPath);

        assert_relative_eq!(rates.thrust, 56_000.0);
        assert_relative_eq!(rates.alpha, 0.0);
        assert_relative_eq!(rates.mach, 10.0 / 340.294, epsilon = 1e-5);
        assert_relative_eq!(rates.drag_coefficient, 0.30);
        assert_relative_eq!(rates.acceleration, 34.8488, epsilon = 1e-4);
        assert_relative_eq!(rates.turn_rate, -4.8971, epsilon = 1e-4);
        assert_relative_eq!(rates.range_rate, 0.871_557, epsilon = 1e-6);
        assert_relative_eq!(rates.climb_rate, 9.961_947, epsilon = 1e-6);
        assert_relative_eq!(rates.mass_rate, -20.0);
        assert!(!rates.fallback_air);
    }

    #[test]
    fn pitch_lead_turns_the_path_up() {
        let vehicle = Vehicle::default();
        let model = FlightModel::new(&vehicle, AlphaLaw::PitchMinusPath);
        let state = FlightState {
            speed: 200.0,
            path_angle: 80.0,
            ..FlightState::launch(&vehicle)
        };

        let rates = model.call(&state).unwrap();
        assert_relative_eq!(rates.alpha, 5.0, epsilon = 1e-12);
        assert!(rates.turn_rate > 0.0);

        let zero = FlightModel::new(&vehicle, AlphaLaw::Zero)
            .call(&state)
            .unwrap();
        assert_relative_eq!(zero.alpha, 0.0);
        assert!(zero.turn_rate < 0.0);
    }

    #[test]
    fn slow_flight_does_not_turn() {
        let vehicle = Vehicle::default();
        let state = FlightState {
            speed: 0.5,
            ..FlightState::launch(&vehicle)
        };

        let rates = FlightModel::new(&vehicle, AlphaLaw::PitchMinusPath)
            .call(&state)
            .unwrap();
        assert_relative_eq!(rates.turn_rate, 0.0);
        assert!(rates.acceleration.is_finite());
    }

    #[test]
    fn uses_fixed_air_above_the_troposphere() {
        let vehicle = Vehicle::default();
        let state = FlightState {
            altitude: 15_000.0,
            speed: 680.0,
            ..FlightState::launch(&vehicle)
        };

        let rates = FlightModel::new(&vehicle, AlphaLaw::Zero)
            .call(&state)
            .unwrap();
        assert!(rates.fallback_air);
        assert_relative_eq!(rates.gravity, 9.806_65);
        assert_relative_eq!(rates.mach, 2.0);
        assert_relative_eq!(rates.drag_coefficient, 0.65);
    }

    #[test]
    fn mass_for_forces_has_a_floor() {
        let vehicle = Vehicle::default();
        let model = FlightModel::new(&vehicle, AlphaLaw::Zero);
        let launch = FlightState::launch(&vehicle);

        let overspent = model
            .call(&FlightState {
                mass: -50.0,
                ..launch
            })
            .unwrap();
        let empty = model
            .call(&FlightState {
                mass: 0.0,
                ..launch
            })
            .unwrap();
        assert!(overspent.acceleration.is_finite());
        assert_relative_eq!(overspent.acceleration, empty.acceleration);
    }

    #[test]
    fn problem_clamps_altitude_and_speed() {
        let state = State::new(1.0, [-3.0, 80.0, 10.0, -2.0, 0.0, 85.0, 1000.0]);

        let stage = FlightProblem
            .build_input(&FlightState::launch(&Vehicle::default()), &state)
            .unwrap();
        assert_relative_eq!(stage.altitude, 0.0);
        assert_relative_eq!(stage.speed, -3.0);

        let accepted = FlightProblem.finalize_step(stage).unwrap();
        assert_relative_eq!(accepted.speed, 0.0);
        assert_relative_eq!(accepted.time, 1.0);
    }

    #[test]
    fn parses_alpha_laws() {
        for law in AlphaLaw::ALL {
            assert_eq!(law.to_string().parse::<AlphaLaw>(), Ok(law));
        }
        assert_eq!(
            "theta-minus-thetac".parse::<AlphaLaw>(),
            Ok(AlphaLaw::PitchMinusPath)
        );
        assert!("ballistic".parse::<AlphaLaw>().is_err());
    }
}
