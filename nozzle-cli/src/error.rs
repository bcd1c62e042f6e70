use std::{io, path::PathBuf};

use thiserror::Error;

use nozzle_gas::{
    ConfigError, ParamsError,
    atmosphere::AtmosphereError,
    trajectory::{ParseAlphaLawError, TrajectoryError},
};
use nozzle_solve::{equation::bisection::BoundsError, transient::ParseMethodError};

/// Errors that end a command-line run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read config file `{path}`")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file `{path}`")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid equation parameters")]
    Params(#[from] ParamsError),

    #[error("invalid solver settings")]
    Config(#[from] ConfigError),

    #[error("invalid fallback bracket")]
    Fallback(#[from] BoundsError),

    #[error("invalid altitude")]
    Atmosphere(#[from] AtmosphereError),

    #[error("invalid section diameter `{0}`")]
    Diameter(f64),

    #[error("invalid trajectory settings")]
    Method(#[from] ParseMethodError),

    #[error("invalid trajectory settings")]
    AlphaLaw(#[from] ParseAlphaLawError),

    #[error("trajectory simulation failed")]
    Trajectory(#[from] TrajectoryError),

    #[error("failed to write results to `{path}`")]
    WriteResults {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
