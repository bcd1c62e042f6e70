use std::{fmt, str::FromStr};

use thiserror::Error;

/// Fixed-step integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Forward Euler: one derivative evaluation per step, first order.
    Euler,

    /// Heun's method: an Euler predictor, then the average of the slopes at
    /// both ends of the step. Second order.
    ModifiedEuler,

    /// Classic fourth-order Runge-Kutta.
    #[default]
    RungeKutta4,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Euler, Method::ModifiedEuler, Method::RungeKutta4];

    /// Returns the order of accuracy of the scheme.
    #[must_use]
    pub fn order(self) -> u32 {
        match self {
            Method::Euler => 1,
            Method::ModifiedEuler => 2,
            Method::RungeKutta4 => 4,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Euler => "euler",
            Method::ModifiedEuler => "modified-euler",
            Method::RungeKutta4 => "rk4",
        })
    }
}

/// An integration method name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integration method `{0}` (expected euler, modified-euler or rk4)")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Method::Euler),
            "modified-euler" | "heun" => Ok(Method::ModifiedEuler),
            "rk4" | "runge-kutta" => Ok(Method::RungeKutta4),
            _ => Err(ParseMethodError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_display() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>(), Ok(method));
        }
    }

    #[test]
    fn accepts_aliases_and_rejects_unknown_names() {
        assert_eq!("Heun".parse::<Method>(), Ok(Method::ModifiedEuler));
        assert_eq!("RK4".parse::<Method>(), Ok(Method::RungeKutta4));
        assert!("midpoint".parse::<Method>().is_err());
    }
}
