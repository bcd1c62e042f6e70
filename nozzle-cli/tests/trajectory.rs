use std::{env, fs, path::PathBuf, process};

use clap::Parser;

use nozzle_cli::{Cli, CliError, Command, FileConfig, TrajectoryArgs, run};
use nozzle_gas::trajectory::{self, FlightEnd, TrajectoryError};
use nozzle_solve::transient::Method;

fn scratch_file(name: &str) -> PathBuf {
    env::temp_dir().join(format!("nozzle-{}-{name}", process::id()))
}

#[test]
fn saves_every_point_to_a_file() {
    let path = scratch_file("euler.tsv");
    let cli = Cli::try_parse_from([
        "nozzle",
        "trajectory",
        "--method",
        "euler",
        "--dt",
        "0.5",
        "--output",
        path.to_str().unwrap(),
    ])
    .unwrap();

    run(&cli).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 62);
    assert!(lines[0].starts_with("N\tt(s)\tm(kg)\tP(N)\tV(m/s)"));
    assert!(lines[61].starts_with("61\t30.000\t655.00\t56000.0\t"));
}

#[test]
fn reports_a_bad_time_step() {
    let cli = Cli::try_parse_from(["nozzle", "trajectory", "--dt", "-1"]).unwrap();
    assert!(matches!(
        run(&cli),
        Err(CliError::Trajectory(TrajectoryError::TimeStep(_)))
    ));
}

#[test]
fn reports_an_unwritable_output_path() {
    let path = scratch_file("missing-dir").join("flight.tsv");
    let cli = Cli {
        config: None,
        heat_capacity_ratio: None,
        throat_diameter: None,
        trace: false,
        command: Some(Command::Trajectory(TrajectoryArgs {
            method: Some(Method::Euler),
            alpha: None,
            dt: Some(1.0),
            output: Some(path),
            rows: 25,
            compare: false,
        })),
    };

    assert!(matches!(run(&cli), Err(CliError::WriteResults { .. })));
}

#[test]
fn config_file_sets_up_the_vehicle() {
    let file: FileConfig = toml::from_str(
        r#"
        [trajectory]
        method = "modified-euler"
        dt_s = 0.05
        mass_flow_kg_s = 100.0
        "#,
    )
    .unwrap();

    let config = file.trajectory.flight_config(None, None, None).unwrap();
    assert_eq!(config.method, Method::ModifiedEuler);

    let flight = trajectory::simulate(&file.trajectory.vehicle(), &config).unwrap();
    assert_eq!(flight.end, FlightEnd::Burnout);
    assert!(flight.last().unwrap().input.mass <= 125.5);
}
