use std::fmt;

use nozzle_core::Snapshot;

use crate::equation::Evaluation;

/// How a bisection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A residual or bracket-width tolerance was met.
    Converged,
    /// The iteration budget ran out first.
    ///
    /// The estimate is the midpoint of the last bracket.
    MaxIters,
    /// An observer returned [`Action::StopEarly`](super::Action::StopEarly).
    StoppedByObserver,
}

impl Status {
    #[must_use]
    pub fn is_converged(self) -> bool {
        self == Status::Converged
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Converged => "converged",
            Status::MaxIters => "iteration limit reached",
            Status::StoppedByObserver => "stopped by observer",
        })
    }
}

/// Root estimate returned by the bisection solver.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    pub status: Status,
    /// Root estimate.
    pub x: f64,
    /// Residual at `x`.
    pub residual: f64,
    /// Model input and output at `x`.
    pub snapshot: Snapshot<I, O>,
    /// Bisection steps taken; zero when an endpoint was already a root.
    pub iters: usize,
}

impl<I, O> Solution<I, O> {
    pub(super) fn from_eval(eval: Evaluation<I, O>, status: Status, iters: usize) -> Self {
        let Evaluation {
            x,
            residual,
            snapshot,
        } = eval;
        Self {
            status,
            x,
            residual,
            snapshot,
            iters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_converged_counts_as_converged() {
        assert!(Status::Converged.is_converged());
        assert!(!Status::MaxIters.is_converged());
        assert!(!Status::StoppedByObserver.is_converged());
    }

    #[test]
    fn displays_readable_status() {
        assert_eq!(Status::Converged.to_string(), "converged");
        assert_eq!(Status::MaxIters.to_string(), "iteration limit reached");
    }
}
