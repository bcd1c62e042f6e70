//! Command-line front end for the nozzle area-Mach solver and the ascent
//! trajectory calculator.
//!
//! The binary is a thin wrapper over [`run`]; the pieces are public so the
//! interactive session can be driven from tests with in-memory buffers.

mod app;
mod args;
mod config;
mod error;
mod report;
mod session;
mod trace;

pub use app::run;
pub use args::{Cli, Command, TrajectoryArgs};
pub use config::{BisectionSection, FallbackSection, FileConfig, TrajectorySection};
pub use error::CliError;
pub use session::{InputError, Session, parse_diameter};
pub use trace::Trace;
