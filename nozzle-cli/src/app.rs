use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use nozzle_gas::{
    RootFinder,
    atmosphere::atmosphere,
    diameter,
    trajectory::{self, FlightConfig, Trajectory, Vehicle},
};
use nozzle_solve::transient::Method;
use uom::si::{f64::Length, length::meter};

use crate::{Cli, CliError, Command, FileConfig, Session, Trace, TrajectoryArgs, report};

/// Step sizes of a `--compare` run, as fractions of `dt`.
const COMPARE_REFINEMENTS: [f64; 2] = [1.0, 0.1];

/// Executes the command described by `cli`.
///
/// # Errors
///
/// Returns a [`CliError`] for invalid configuration, an invalid one-shot
/// diameter or altitude, a failed simulation, or an I/O failure.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        None => solve(cli, None),
        Some(Command::Solve { di }) => solve(cli, *di),
        Some(Command::Atmosphere { altitude }) => {
            let air = atmosphere(Length::new::<meter>(*altitude))?;
            let mut out = io::stdout().lock();
            report::write_atmosphere(&mut out, &air)?;
            Ok(out.flush()?)
        }
        Some(Command::Trajectory(args)) => fly(cli, args),
    }
}

fn solve(cli: &Cli, di: Option<f64>) -> Result<(), CliError> {
    let finder = build_finder(cli)?;
    let session = Session::new(&finder);
    let mut out = io::stdout().lock();

    match (di, cli.trace) {
        (Some(value), trace) => {
            let local = diameter(value).map_err(|_| CliError::Diameter(value))?;
            if trace {
                session.solve_once(&local, &mut out, Trace::new(io::stderr()))?;
            } else {
                session.solve_once(&local, &mut out, ())?;
            }
        }
        (None, true) => session.run(io::stdin().lock(), &mut out, Trace::new(io::stderr()))?,
        (None, false) => session.run(io::stdin().lock(), &mut out, ())?,
    }

    Ok(out.flush()?)
}

fn fly(cli: &Cli, args: &TrajectoryArgs) -> Result<(), CliError> {
    let file = load_file(cli)?;
    let vehicle = file.trajectory.vehicle();
    let config = file
        .trajectory
        .flight_config(args.method, args.alpha, args.dt)?;

    let mut out = io::stdout().lock();
    report::write_flight_setup(&mut out, &vehicle, &config)?;

    if args.compare {
        let runs = compare(&vehicle, &config)?;
        report::write_comparison(&mut out, &runs)?;
    } else {
        let flight = trajectory::simulate(&vehicle, &config)?;
        report::write_trajectory(&mut out, &flight, args.rows)?;
        if let Some(path) = &args.output {
            save(path, &flight)?;
            writeln!(out, "Results saved to {}", path.display())?;
        }
    }

    Ok(out.flush()?)
}

/// Runs every method at each refinement of the configured step.
fn compare(vehicle: &Vehicle, config: &FlightConfig) -> Result<Vec<Trajectory>, CliError> {
    let mut runs = Vec::with_capacity(Method::ALL.len() * COMPARE_REFINEMENTS.len());
    for method in Method::ALL {
        for refinement in COMPARE_REFINEMENTS {
            let run = FlightConfig {
                method,
                dt: config.dt * refinement,
                ..*config
            };
            runs.push(trajectory::simulate(vehicle, &run)?);
        }
    }
    Ok(runs)
}

fn save(path: &Path, flight: &Trajectory) -> Result<(), CliError> {
    write_file(path, flight).map_err(|source| CliError::WriteResults {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, flight: &Trajectory) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    report::write_trajectory_file(&mut file, flight)?;
    file.flush()
}

fn build_finder(cli: &Cli) -> Result<RootFinder, CliError> {
    load_file(cli)?.finder(cli.heat_capacity_ratio, cli.throat_diameter)
}

fn load_file(cli: &Cli) -> Result<FileConfig, CliError> {
    match &cli.config {
        Some(path) => FileConfig::load(path),
        None => Ok(FileConfig::default()),
    }
}
