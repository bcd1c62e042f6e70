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

use super::TrajectoryError;

/// Launch conditions and mass properties of a rocket flying a powered
/// ascent.
///
/// The defaults describe a 1255 kg vehicle leaving the rail at 10 m/s and 85°
/// with a 20 kg/s motor and 2800 m/s effective exhaust velocity, flown for
/// 30 s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub initial_speed: Velocity,
    /// Initial flight-path angle `theta_c`.
    pub flight_path_angle: Angle,
    /// Initial pitch angle `theta`. The default equals the flight-path angle.
    pub pitch: Angle,
    /// Initial pitch rate `omega_z`; it stays constant during the flight.
    pub pitch_rate: AngularVelocity,
    pub initial_altitude: Length,
    pub initial_mass: Mass,
    /// Propellant mass flow, constant during the burn.
    pub mass_flow: MassRate,
    /// Effective exhaust velocity; thrust is `mass_flow * exhaust_velocity`.
    pub exhaust_velocity: Velocity,
    /// Aerodynamic reference (midsection) area `S_m`.
    pub reference_area: Area,
    /// Duration of the simulated flight.
    pub burn_time: Time,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            initial_speed: Velocity::new::<meter_per_second>(10.0),
            flight_path_angle: Angle::new::<degree>(85.0),
            pitch: Angle::new::<degree>(85.0),
            pitch_rate: AngularVelocity::new::<degree_per_second>(0.0),
            initial_altitude: Length::new::<meter>(0.0),
            initial_mass: Mass::new::<kilogram>(1255.0),
            mass_flow: MassRate::new::<kilogram_per_second>(20.0),
            exhaust_velocity: Velocity::new::<meter_per_second>(2800.0),
            reference_area: Area::new::<square_meter>(0.231),
            burn_time: Time::new::<second>(30.0),
        }
    }
}

impl Vehicle {
    /// Checks that every quantity is finite and physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::Vehicle`] naming the first offending field.
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        let checks = [
            (
                "initial_speed",
                self.initial_speed.get::<meter_per_second>(),
                Bound::NonNegative,
            ),
            (
                "flight_path_angle",
                self.flight_path_angle.get::<degree>(),
                Bound::Finite,
            ),
            ("pitch", self.pitch.get::<degree>(), Bound::Finite),
            (
                "pitch_rate",
                self.pitch_rate.get::<degree_per_second>(),
                Bound::Finite,
            ),
            (
                "initial_altitude",
                self.initial_altitude.get::<meter>(),
                Bound::NonNegative,
            ),
            (
                "initial_mass",
                self.initial_mass.get::<kilogram>(),
                Bound::Positive,
            ),
            (
                "mass_flow",
                self.mass_flow.get::<kilogram_per_second>(),
                Bound::NonNegative,
            ),
            (
                "exhaust_velocity",
                self.exhaust_velocity.get::<meter_per_second>(),
                Bound::NonNegative,
            ),
            (
                "reference_area",
                self.reference_area.get::<square_meter>(),
                Bound::NonNegative,
            ),
            ("burn_time", self.burn_time.get::<second>(), Bound::Positive),
        ];

        match checks
            .into_iter()
            .find(|&(_, value, bound)| !bound.holds(value))
        {
            Some((field, value, _)) => Err(TrajectoryError::Vehicle { field, value }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Finite,
    NonNegative,
    Positive,
}

impl Bound {
    fn holds(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Bound::Finite => true,
                Bound::NonNegative => value >= 0.0,
                Bound::Positive => value > 0.0,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(Vehicle::default().validate().is_ok());
    }

    #[test]
    fn names_the_bad_field() {
        let vehicle = Vehicle {
            initial_mass: Mass::new::<kilogram>(0.0),
            ..Vehicle::default()
        };
        assert!(matches!(
            vehicle.validate(),
            Err(TrajectoryError::Vehicle {
                field: "initial_mass",
                ..
            })
        ));

        let vehicle = Vehicle {
            pitch: Angle::new::<degree>(f64::NAN),
            ..Vehicle::default()
        };
        assert!(matches!(
            vehicle.validate(),
            Err(TrajectoryError::Vehicle { field: "pitch", .. })
        ));

        let vehicle = Vehicle {
            mass_flow: MassRate::new::<kilogram_per_second>(-1.0),
            ..Vehicle::default()
        };
        assert!(vehicle.validate().is_err());
    }
}
