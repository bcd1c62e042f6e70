use std::io::{self, BufRead, Write};

use thiserror::Error;

use nozzle_core::{Observer, constraint::ConstraintError};
use nozzle_gas::{Diameter, ParamsError, RootFinder, ScanEvent, diameter};
use nozzle_solve::equation::bisection::Action;
use uom::si::length::meter;

use crate::report;

/// Why a line typed at the prompt was not accepted as a diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("enter a valid number!")]
    NotANumber,

    #[error("di must be a positive number!")]
    NotPositive,
}

/// Parses a section diameter in meters.
///
/// # Errors
///
/// Returns [`InputError::NotANumber`] for unparsable text or NaN, and
/// [`InputError::NotPositive`] for zero or negative values.
pub fn parse_diameter(entry: &str) -> Result<Diameter, InputError> {
    let value: f64 = entry.parse().map_err(|_| InputError::NotANumber)?;
    diameter(value).map_err(|err| match err {
        ParamsError::Diameter(ConstraintError::NotANumber) => InputError::NotANumber,
        _ => InputError::NotPositive,
    })
}

/// Prompt loop that solves for each diameter the user enters.
///
/// Bad input is reported and the prompt repeats. The loop ends on `q`
/// (either case) or at end of input.
pub struct Session<'a> {
    finder: &'a RootFinder,
}

impl<'a> Session<'a> {
    pub fn new(finder: &'a RootFinder) -> Self {
        Self { finder }
    }

    /// Runs the loop until the user quits or input ends.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily, so they fail to
    /// parse and are reported like any other bad entry.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run<R, W, Obs>(
        &self,
        mut input: R,
        out: &mut W,
        mut observer: Obs,
    ) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
        Obs: for<'e> Observer<ScanEvent<'e>, Action>,
    {
        report::write_banner(out, self.finder.params())?;

        let mut buf = Vec::new();
        loop {
            write!(out, "Enter di (or 'q' to quit): ")?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(out)?;
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let entry = line.trim();

            if entry.eq_ignore_ascii_case("q") {
                writeln!(out, "Exiting.")?;
                break;
            }

            match parse_diameter(entry) {
                Ok(local) => self.solve_once(&local, out, |event: &ScanEvent<'_>| {
                    observer.observe(event)
                })?,
                Err(err) => writeln!(out, "Error: {err}")?,
            }
        }
        Ok(())
    }

    /// Solves for a single diameter and writes the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn solve_once<W, Obs>(
        &self,
        local: &Diameter,
        out: &mut W,
        observer: Obs,
    ) -> io::Result<()>
    where
        W: Write,
        Obs: for<'e> Observer<ScanEvent<'e>, Action>,
    {
        let set = self.finder.find_roots_observed(local, observer);
        report::write_roots(
            out,
            local.as_ref().get::<meter>(),
            self.finder.params(),
            &set,
        )
    }
}
