use std::io::{self, Write};

use nozzle_gas::{
    NozzleParams, RootSet,
    atmosphere::Atmosphere,
    trajectory::{FlightConfig, FlightEnd, Trajectory, Vehicle},
};
use uom::si::{
    acceleration::meter_per_second_squared, angle::degree, angular_velocity::degree_per_second,
    area::square_meter, length::meter, mass::kilogram, mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second, pressure::pascal, thermodynamic_temperature::kelvin,
    time::second, velocity::meter_per_second,
};

const RULE: &str = "----------------------------------------------------------------------";

/// Column header of a saved trajectory; one tab-separated row per point follows.
pub(crate) const TRAJECTORY_FILE_HEADER: &str = "N\tt(s)\tm(kg)\tP(N)\tV(m/s)\tM\tCxa\t\
     alpha(deg)\ttheta_c(deg)\tCya_alpha\tomega_z(deg/s)\ttheta(deg)\ty(m)\tx(m)\t\
     g(m/s2)\tx_dot(m/s)\ty_dot(m/s)\tV_dot(m/s2)";

/// Writes the equation and parameter banner shown before the prompt.
pub(crate) fn write_banner(out: &mut impl Write, params: &NozzleParams) -> io::Result<()> {
    writeln!(out, "Isentropic nozzle area-Mach solver")?;
    writeln!(
        out,
        "M * ((k+1)/2)^((k+1)/(2*(k-1))) * (1 + (k-1)/2 * M^2)^(-(k+1)/(2*(k-1))) = (d*/di)^2"
    )?;
    writeln!(
        out,
        "k = {}, d* = {}",
        params.heat_capacity_ratio(),
        params.throat_diameter().get::<meter>()
    )?;
    writeln!(out, "{RULE}")
}

/// Writes the roots found for one section diameter.
pub(crate) fn write_roots(
    out: &mut impl Write,
    local_m: f64,
    params: &NozzleParams,
    set: &RootSet,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Results for di = {local_m}:")?;
    writeln!(out, "Right-hand side: {:.10}", set.target())?;

    if set.is_empty() {
        writeln!(out, "  No roots found. Try another value of di.")?;
    }

    for (n, root) in set.iter().enumerate() {
        let left = params.area_ratio(root.mach);
        let error = (left - set.target()).abs();

        writeln!(out, "  Solution {}:", n + 1)?;
        writeln!(out, "    M = {:.8} ({} regime)", root.mach, root.regime)?;
        writeln!(out, "    Left-hand side: {left:.10}")?;
        writeln!(out, "    Error: {error:.2e}")?;
        if !root.status.is_converged() {
            writeln!(
                out,
                "    Warning: stopped after {} iterations without converging",
                root.iters
            )?;
        }
    }

    writeln!(out, "{RULE}")
}

/// Writes standard-atmosphere properties.
pub(crate) fn write_atmosphere(out: &mut impl Write, air: &Atmosphere) -> io::Result<()> {
    writeln!(
        out,
        "Geopotential height: {:.3} m",
        air.geopotential_height.get::<meter>()
    )?;
    writeln!(
        out,
        "Gravity:             {:.5} m/s^2",
        air.gravity.get::<meter_per_second_squared>()
    )?;
    writeln!(
        out,
        "Temperature:         {:.3} K",
        air.temperature.get::<kelvin>()
    )?;
    writeln!(
        out,
        "Pressure:            {:.2} Pa",
        air.pressure.get::<pascal>()
    )?;
    writeln!(
        out,
        "Density:             {:.5} kg/m^3",
        air.density.get::<kilogram_per_cubic_meter>()
    )?;
    writeln!(
        out,
        "Speed of sound:      {:.3} m/s",
        air.speed_of_sound.get::<meter_per_second>()
    )
}

/// Writes the vehicle and integration settings of a trajectory run.
pub(crate) fn write_flight_setup(
    out: &mut impl Write,
    vehicle: &Vehicle,
    config: &FlightConfig,
) -> io::Result<()> {
    writeln!(out, "Powered ascent trajectory")?;
    writeln!(
        out,
        "V0 = {} m/s, theta_c0 = {:.2} deg, theta0 = {:.2} deg, omega_z0 = {:.2} deg/s",
        vehicle.initial_speed.get::<meter_per_second>(),
        vehicle.flight_path_angle.get::<degree>(),
        vehicle.pitch.get::<degree>(),
        vehicle.pitch_rate.get::<degree_per_second>(),
    )?;
    writeln!(
        out,
        "y0 = {} m, m0 = {} kg, m_dot = {} kg/s, W = {} m/s, S_m = {} m^2",
        vehicle.initial_altitude.get::<meter>(),
        vehicle.initial_mass.get::<kilogram>(),
        vehicle.mass_flow.get::<kilogram_per_second>(),
        vehicle.exhaust_velocity.get::<meter_per_second>(),
        vehicle.reference_area.get::<square_meter>(),
    )?;
    writeln!(
        out,
        "t_end = {} s, method = {}, alpha = {}, dt = {} s",
        vehicle.burn_time.get::<second>(),
        config.method,
        config.law,
        config.dt,
    )?;
    writeln!(out, "{RULE}")
}

/// Writes about `rows` evenly spaced points of a trajectory, then its final
/// state.
pub(crate) fn write_trajectory(
    out: &mut impl Write,
    flight: &Trajectory,
    rows: usize,
) -> io::Result<()> {
    let Some(last) = flight.last() else {
        return writeln!(out, "Trajectory is empty.");
    };

    writeln!(
        out,
        "{:>4}{:>8}{:>8}{:>8}{:>8}{:>8}{:>10}{:>8}{:>10}{:>8}",
        "N", "t(s)", "V(m/s)", "V_dot", "M", "alpha", "theta_c", "y(m)", "x(m)", "m(kg)"
    )?;
    writeln!(out, "{}", "-".repeat(80))?;

    let stride = (flight.points.len() / rows.max(1)).max(1);
    for (n, point) in flight.points.iter().enumerate().step_by(stride) {
        let (state, rates) = (&point.input, &point.output);
        writeln!(
            out,
            "{:>4}{:>8.1}{:>8.1}{:>8.2}{:>8.3}{:>8.2}{:>10.2}{:>8.0}{:>10.0}{:>8.1}",
            n + 1,
            state.time,
            state.speed,
            rates.acceleration,
            rates.mach,
            rates.alpha,
            state.path_angle,
            state.altitude,
            state.range,
            state.mass,
        )?;
    }

    let (state, rates) = (&last.input, &last.output);
    let end = match flight.end {
        FlightEnd::BurnTime => "burn time reached",
        FlightEnd::Burnout => "burnout",
    };
    writeln!(out)?;
    writeln!(out, "Final values ({end}):")?;
    writeln!(out, "  Flight time:      {:.3} s", state.time)?;
    writeln!(out, "  Speed:            {:.3} m/s", state.speed)?;
    writeln!(out, "  Acceleration:     {:.3} m/s^2", rates.acceleration)?;
    writeln!(out, "  Altitude:         {:.2} m", state.altitude)?;
    writeln!(out, "  Range:            {:.2} m", state.range)?;
    writeln!(out, "  Mass:             {:.2} kg", state.mass)?;
    writeln!(out, "  Horizontal speed: {:.3} m/s", rates.range_rate)?;
    writeln!(out, "  Vertical speed:   {:.3} m/s", rates.climb_rate)?;
    if let Some(apex) = flight.apex() {
        writeln!(
            out,
            "  Apex:             {:.2} m at t = {:.3} s",
            apex.input.altitude, apex.input.time
        )?;
    }

    if flight.points.iter().any(|point| point.output.fallback_air) {
        writeln!(
            out,
            "  Note: above 11000 m fixed sea-level air (g = 9.80665, rho = 1.225, a = 340) was used"
        )?;
    }
    writeln!(out, "{RULE}")
}

/// Writes every point of a trajectory as a tab-separated table.
pub(crate) fn write_trajectory_file(out: &mut impl Write, flight: &Trajectory) -> io::Result<()> {
    writeln!(out, "{TRAJECTORY_FILE_HEADER}")?;
    for (n, point) in flight.points.iter().enumerate() {
        let (state, rates) = (&point.input, &point.output);
        writeln!(
            out,
            "{}\t{:.3}\t{:.2}\t{:.1}\t{:.3}\t{:.4}\t{:.4}\t{:.2}\t{:.2}\t{:.4}\t{:.4}\t{:.2}\t{:.2}\t{:.2}\t{:.4}\t{:.3}\t{:.3}\t{:.3}",
            n + 1,
            state.time,
            state.mass,
            rates.thrust,
            state.speed,
            rates.mach,
            rates.drag_coefficient,
            rates.alpha,
            state.path_angle,
            rates.lift_slope,
            state.pitch_rate,
            state.pitch,
            state.altitude,
            state.range,
            rates.gravity,
            rates.range_rate,
            rates.climb_rate,
            rates.acceleration,
        )?;
    }
    Ok(())
}

/// Writes the final state of several runs side by side.
pub(crate) fn write_comparison(out: &mut impl Write, runs: &[Trajectory]) -> io::Result<()> {
    writeln!(
        out,
        "{:<16}{:>9}{:>8}{:>9}{:>11}{:>12}{:>11}{:>10}{:>9}",
        "method", "dt(s)", "steps", "t(s)", "V(m/s)", "y(m)", "x(m)", "theta_c", "m(kg)"
    )?;
    writeln!(out, "{}", "-".repeat(95))?;

    for flight in runs {
        let Some(last) = flight.last() else {
            continue;
        };
        let state = &last.input;
        writeln!(
            out,
            "{:<16}{:>9}{:>8}{:>9.3}{:>11.4}{:>12.3}{:>11.3}{:>10.4}{:>9.2}",
            flight.config.method.to_string(),
            flight.config.dt,
            flight.points.len() - 1,
            state.time,
            state.speed,
            state.altitude,
            state.range,
            state.path_angle,
            state.mass,
        )?;
    }
    writeln!(out, "{RULE}")
}
