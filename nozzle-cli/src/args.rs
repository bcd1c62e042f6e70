use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use nozzle_gas::trajectory::AlphaLaw;
use nozzle_solve::transient::Method;

#[derive(Parser, Debug)]
#[command(name = "nozzle")]
#[command(version)]
#[command(
    about = "Solve the isentropic area-Mach relation for nozzle sections and integrate ascent trajectories",
    long_about = None
)]
pub struct Cli {
    /// TOML file with equation parameters and solver settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Specific heat ratio k (overrides the config file)
    #[arg(short = 'k', long = "k", global = true)]
    pub heat_capacity_ratio: Option<f64>,

    /// Throat diameter d* in meters (overrides the config file)
    #[arg(long = "d-star", global = true)]
    pub throat_diameter: Option<f64>,

    /// Report bisection progress and skipped intervals on stderr
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Find Mach numbers for a section diameter (prompts when --di is absent)
    Solve {
        /// Section diameter d_i in meters
        #[arg(long, allow_negative_numbers = true)]
        di: Option<f64>,
    },

    /// Print standard-atmosphere properties at an altitude
    Atmosphere {
        /// Geometric altitude in meters (0 to 11000)
        #[arg(short = 'a', long, allow_negative_numbers = true)]
        altitude: f64,
    },

    /// Integrate a powered ascent and print the trajectory
    Trajectory(TrajectoryArgs),
}

/// Options for the `trajectory` subcommand.
///
/// Unset options fall back to the `[trajectory]` table of the config file.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct TrajectoryArgs {
    /// Integration method: euler, modified-euler or rk4
    #[arg(short, long)]
    pub method: Option<Method>,

    /// Angle-of-attack law: pitch-minus-path or zero
    #[arg(long)]
    pub alpha: Option<AlphaLaw>,

    /// Time step in seconds
    #[arg(long, allow_negative_numbers = true)]
    pub dt: Option<f64>,

    /// Save every point as a tab-separated table
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Approximate number of table rows printed
    #[arg(long, default_value_t = 25)]
    pub rows: usize,

    /// Run every method at dt and dt/10 and compare the final states
    #[arg(long, conflicts_with = "output")]
    pub compare: bool,
}
