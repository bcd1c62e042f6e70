//! Powered ascent of a rocket in the vertical plane.
//!
//! A point-mass [`FlightModel`] with thrust, tabulated drag and lift, and
//! gravity is integrated by a fixed-step [`Method`] until the burn time ends
//! or the vehicle is down to [`BURNOUT_FRACTION`] of its launch mass.
//! Air data come from [`atmosphere`](crate::atmosphere::atmosphere); above its
//! range fixed sea-level air is used instead.

mod aero;
mod flight;
mod vehicle;

pub use aero::{MAX_MACH, MIN_MACH, drag_coefficient, lift_slope};
pub use flight::{
    AlphaLaw, FlightModel, FlightProblem, FlightRates, FlightState, ParseAlphaLawError, STATE_LEN,
};
pub use vehicle::Vehicle;

use thiserror::Error;
use uom::si::{mass::kilogram, time::second};

use nozzle_core::Snapshot;
use nozzle_solve::transient::{self, Action, Event, Method, Status};

/// The flight ends once mass falls to this fraction of launch mass.
pub const BURNOUT_FRACTION: f64 = 0.1;

/// Largest number of steps a single run may take.
pub const MAX_STEPS: usize = 10_000_000;

/// One recorded point: the flight state and the rates evaluated there.
pub type TrajectoryPoint = Snapshot<FlightState, FlightRates>;

/// Errors raised when setting up or integrating a flight.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("vehicle `{field}` is out of range: {value}")]
    Vehicle { field: &'static str, value: f64 },

    #[error("time step must be finite and positive, got {0} s")]
    TimeStep(f64),

    #[error("{steps} steps needed, more than the limit of 10000000")]
    TooManySteps { steps: f64 },

    #[error("integration failed")]
    Integration(#[from] transient::Error),
}

/// Why the integration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEnd {
    /// The burn time was reached.
    BurnTime,
    /// Mass fell to [`BURNOUT_FRACTION`] of launch mass first.
    Burnout,
}

/// Integration settings for [`simulate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightConfig {
    pub method: Method,
    pub law: AlphaLaw,
    /// Step size, s.
    pub dt: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            method: Method::RungeKutta4,
            law: AlphaLaw::PitchMinusPath,
            dt: 0.01,
        }
    }
}

/// A simulated flight, one point per step starting at launch.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub config: FlightConfig,
    pub points: Vec<TrajectoryPoint>,
    pub end: FlightEnd,
}

impl Trajectory {
    /// The last recorded point.
    #[must_use]
    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    /// The highest recorded point.
    #[must_use]
    pub fn apex(&self) -> Option<&TrajectoryPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.input.altitude.total_cmp(&b.input.altitude))
    }
}

/// Integrates the flight of `vehicle`.
///
/// The run takes `ceil(burn_time / dt)` steps, stopping early at burnout.
///
/// # Errors
///
/// Returns an error if the vehicle does not validate, or `dt` is not finite
/// and positive or needs more than [`MAX_STEPS`] steps.
pub fn simulate(vehicle: &Vehicle, config: &FlightConfig) -> Result<Trajectory, TrajectoryError> {
    vehicle.validate()?;

    let dt = config.dt;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(TrajectoryError::TimeStep(dt));
    }
    // Rounding allowance: 30 s at 0.1 s is 300 steps, not 301.
    let steps = (vehicle.burn_time.get::<second>() / dt - 1e-9).ceil().max(0.0);
    if steps > MAX_STEPS as f64 {
        return Err(TrajectoryError::TooManySteps { steps });
    }

    let burnout_mass = BURNOUT_FRACTION * vehicle.initial_mass.get::<kilogram>();
    let solution = transient::solve(
        &FlightModel::new(vehicle, config.law),
        &FlightProblem,
        FlightState::launch(vehicle),
        config.method,
        dt,
        steps as usize,
        |event: &Event<'_, FlightState, FlightRates>| {
            (event.snapshot.input.mass <= burnout_mass).then_some(Action::StopEarly)
        },
    )?;

    Ok(Trajectory {
        config: *config,
        end: match solution.status {
            Status::Complete => FlightEnd::BurnTime,
            Status::StoppedByObserver => FlightEnd::Burnout,
        },
        points: solution.history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nozzle_core::OdeProblem;
    use uom::si::{
        f64::{MassRate, Time},
        mass_rate::kilogram_per_second,
    };

    fn fly(vehicle: &Vehicle, method: Method, dt: f64) -> Trajectory {
        simulate(
            vehicle,
            &FlightConfig {
                method,
                dt,
                ..FlightConfig::default()
            },
        )
        .unwrap()
    }

    fn short_burn() -> Vehicle {
        Vehicle {
            burn_time: Time::new::<second>(10.0),
            ..Vehicle::default()
        }
    }

    fn is_finite(point: &TrajectoryPoint) -> bool {
        let FlightRates {
            thrust,
            gravity,
            mach,
            drag_coefficient,
            lift_slope,
            alpha,
            acceleration,
            turn_rate,
            range_rate,
            climb_rate,
            mass_rate,
            fallback_air: _,
        } = point.output;

        FlightProblem.state(&point.input).is_ok_and(|s| s.is_finite())
            && [
                thrust,
                gravity,
                mach,
                drag_coefficient,
                lift_slope,
                alpha,
                acceleration,
                turn_rate,
                range_rate,
                climb_rate,
                mass_rate,
            ]
            .iter()
            .all(|value| value.is_finite())
    }

    #[test]
    fn runs_for_the_burn_time() {
        let flight = fly(&short_burn(), Method::RungeKutta4, 0.1);

        assert_eq!(flight.end, FlightEnd::BurnTime);
        assert_eq!(flight.points.len(), 101);

        let last = flight.last().unwrap();
        assert_relative_eq!(last.input.time, 10.0, epsilon = 1e-9);
        assert_relative_eq!(last.input.mass, 1055.0, epsilon = 1e-9);
        assert!(last.input.altitude > 1000.0);
        assert!(last.input.speed > 300.0);
    }

    #[test]
    fn every_method_converges_as_the_step_shrinks() {
        let vehicle = short_burn();
        let reference = *fly(&vehicle, Method::RungeKutta4, 0.001).last().unwrap();

        let error = |method, dt| {
            let point = *fly(&vehicle, method, dt).last().unwrap();
            (
                (point.input.speed - reference.input.speed).abs(),
                (point.input.altitude - reference.input.altitude).abs(),
            )
        };

        for method in Method::ALL {
            let (coarse_speed, coarse_altitude) = error(method, 0.1);
            let (fine_speed, fine_altitude) = error(method, 0.01);

            assert!(fine_speed < 0.2 * coarse_speed, "{method} speed");
            assert!(fine_altitude < 0.2 * coarse_altitude, "{method} altitude");
        }

        let (euler, _) = error(Method::Euler, 0.1);
        let (rk4, _) = error(Method::RungeKutta4, 0.1);
        assert!(rk4 < 0.01 * euler);
    }

    #[test]
    fn large_steps_stay_finite() {
        for dt in [1.0, 2.0, 5.0, 10.0, 30.0] {
            for method in Method::ALL {
                let flight = fly(&Vehicle::default(), method, dt);

                assert!(
                    flight.points.iter().all(is_finite),
                    "{method} produced a non-finite value at dt = {dt}"
                );
                assert!(flight.points.iter().all(|p| p.input.speed >= 0.0));
                assert!(flight.points.iter().all(|p| p.input.altitude >= 0.0));
            }
        }
    }

    #[test]
    fn climbs_past_the_troposphere_on_fixed_air() {
        let flight = fly(&Vehicle::default(), Method::RungeKutta4, 0.1);

        let apex = flight.apex().unwrap();
        assert!(apex.input.altitude > 11_000.0);

        for point in &flight.points {
            if point.input.altitude > 11_000.0 {
                assert!(point.output.fallback_air);
                assert_relative_eq!(point.output.gravity, 9.806_65);
            } else {
                assert!(!point.output.fallback_air);
            }
        }
    }

    #[test]
    fn stops_at_burnout() {
        let vehicle = Vehicle {
            mass_flow: MassRate::new::<kilogram_per_second>(100.0),
            ..Vehicle::default()
        };
        let flight = fly(&vehicle, Method::RungeKutta4, 0.1);

        assert_eq!(flight.end, FlightEnd::Burnout);
        assert_eq!(flight.points.len(), 114);

        let [.., before, last] = flight.points.as_slice() else {
            panic!("too few points");
        };
        assert!(before.input.mass > 125.5);
        assert!(last.input.mass <= 125.5);
        assert!(flight.points.iter().all(is_finite));
    }

    #[test]
    fn zero_alpha_flies_a_gravity_turn() {
        let flight = simulate(
            &short_burn(),
            &FlightConfig {
                law: AlphaLaw::Zero,
                dt: 0.1,
                ..FlightConfig::default()
            },
        )
        .unwrap();

        assert!(flight.points.iter().all(|p| p.output.alpha.abs() < 1e-12));
        assert!(flight.last().unwrap().input.path_angle < 85.0);
    }

    #[test]
    fn rejects_bad_settings() {
        for dt in [0.0, -0.1, f64::NAN] {
            let result = simulate(
                &Vehicle::default(),
                &FlightConfig {
                    dt,
                    ..FlightConfig::default()
                },
            );
            assert!(matches!(result, Err(TrajectoryError::TimeStep(_))));
        }

        let result = simulate(
            &Vehicle::default(),
            &FlightConfig {
                dt: 1e-9,
                ..FlightConfig::default()
            },
        );
        assert!(matches!(result, Err(TrajectoryError::TooManySteps { .. })));

        let vehicle = Vehicle {
            burn_time: Time::new::<second>(0.0),
            ..Vehicle::default()
        };
        assert!(matches!(
            simulate(&vehicle, &FlightConfig::default()),
            Err(TrajectoryError::Vehicle {
                field: "burn_time",
                ..
            })
        ));
    }
}
