//! Tabulated aerodynamic coefficients against Mach number.

/// Lowest tabulated Mach number.
pub const MIN_MACH: f64 = 0.01;

/// Highest tabulated Mach number.
pub const MAX_MACH: f64 = 10.2;

const MACH: [f64; 15] = [
    MIN_MACH, 0.55, 0.8, 0.9, 1.0, 1.06, 1.1, 1.2, 1.3, 1.4, 2.0, 2.6, 3.4, 6.0, MAX_MACH,
];

const DRAG: [f64; 15] = [
    0.30, 0.30, 0.55, 0.70, 0.84, 0.86, 0.87, 0.83, 0.80, 0.79, 0.65, 0.55, 0.50, 0.45, 0.41,
];

const LIFT_SLOPE: [f64; 15] = [
    0.25, 0.25, 0.25, 0.20, 0.30, 0.31, 0.25, 0.25, 0.25, 0.25, 0.25, 0.25, 0.25, 0.25, 0.25,
];

/// Drag coefficient `Cxa` at `mach`.
#[must_use]
pub fn drag_coefficient(mach: f64) -> f64 {
    interpolate(mach, &MACH, &DRAG)
}

/// Lift-curve slope `Cya^alpha` (per radian) at `mach`.
#[must_use]
pub fn lift_slope(mach: f64) -> f64 {
    interpolate(mach, &MACH, &LIFT_SLOPE)
}

/// Piecewise-linear lookup in an ascending table.
///
/// Values outside the table hold the end values. A NaN lookup returns the
/// first value.
fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());

    let (Some(&first), Some(&last)) = (ys.first(), ys.last()) else {
        return f64::NAN;
    };
    if x.is_nan() || x <= xs[0] {
        return first;
    }
    if x >= xs[xs.len() - 1] {
        return last;
    }

    let upper = xs.partition_point(|&node| node <= x);
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
