use thiserror::Error;

use nozzle_core::Model;

use crate::equation::{EquationProblem, Evaluation, evaluate};

use super::Error;

/// Outer bounds of the default fallback grid, tried in this order.
pub const DEFAULT_OUTER_BOUNDS: [f64; 8] = [0.1, 0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 10.0];

/// Inner bounds of the default fallback grid, tried in this order for each outer bound.
pub const DEFAULT_INNER_BOUNDS: [f64; 3] = [0.01, 0.05, 0.1];

/// Errors that can occur when validating bracket bounds.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoundsError {
    /// One or both endpoints are non-finite.
    #[error("non-finite endpoint(s)")]
    NonFinite,
    /// Endpoints are equal, giving zero width.
    #[error("zero width")]
    ZeroWidth,
}

/// Ordered finite bounds for a bisection bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    left: f64,
    right: f64,
}

impl Bounds {
    /// Validates and orders the bracket endpoints.
    ///
    /// # Errors
    ///
    /// Returns `BoundsError` if endpoints are non-finite or zero width.
    pub fn new(bracket: [f64; 2]) -> Result<Self, BoundsError> {
        let [left, right] = bracket;

        if !left.is_finite() || !right.is_finite() {
            return Err(BoundsError::NonFinite);
        }

        #[allow(clippy::float_cmp)]
        if left == right {
            return Err(BoundsError::ZeroWidth);
        }

        if left < right {
            Ok(Self { left, right })
        } else {
            Ok(Self {
                left: right,
                right: left,
            })
        }
    }

    /// Returns the bounds as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left, self.right]
    }
}

/// An ordered list of fallback brackets.
///
/// When the caller's bracket shows no sign change, candidates are tried in
/// order and the first one that straddles a root is used.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates(Vec<Bounds>);

impl Candidates {
    /// Creates a candidate list from explicit brackets, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `BoundsError` if any bracket is non-finite or zero width.
    pub fn new(brackets: impl IntoIterator<Item = [f64; 2]>) -> Result<Self, BoundsError> {
        brackets
            .into_iter()
            .map(Bounds::new)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// An empty list, so only the caller's bracket is tried.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Crosses outer and inner bounds into `[inner, outer]` brackets.
    ///
    /// Iterates outer bounds in order and, for each, inner bounds in order,
    /// keeping only pairs with `inner < outer`.
    ///
    /// # Errors
    ///
    /// Returns `BoundsError::NonFinite` if a kept pair has a non-finite bound.
    pub fn grid(outer: &[f64], inner: &[f64]) -> Result<Self, BoundsError> {
        let mut brackets = Vec::with_capacity(outer.len() * inner.len());
        for &hi in outer {
            for &lo in inner.iter().filter(|&&lo| lo < hi) {
                brackets.push(Bounds::new([lo, hi])?);
            }
        }
        Ok(Self(brackets))
    }

    /// Returns the candidate brackets in the order they are tried.
    pub fn iter(&self) -> impl Iterator<Item = &Bounds> {
        self.0.iter()
    }

    /// Returns the number of candidate brackets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no fallback brackets, so only the initial
    /// bracket is ever tried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The default grid built from [`DEFAULT_OUTER_BOUNDS`] and [`DEFAULT_INNER_BOUNDS`].
impl Default for Candidates {
    fn default() -> Self {
        let brackets = DEFAULT_OUTER_BOUNDS
            .iter()
            .flat_map(|&right| {
                DEFAULT_INNER_BOUNDS
                    .iter()
                    .filter(move |&&left| left < right)
                    .map(move |&left| Bounds { left, right })
            })
            .collect();
        Self(brackets)
    }
}

/// A bracket whose endpoint residuals change sign (or touch zero).
#[derive(Debug, Clone)]
pub struct Bracket<I, O> {
    pub(super) left: Evaluation<I, O>,
    pub(super) right: Evaluation<I, O>,
}

impl<I, O> Bracket<I, O> {
    /// Pairs two endpoint evaluations if their residuals straddle zero.
    fn straddling(left: Evaluation<I, O>, right: Evaluation<I, O>) -> Option<Self> {
        if straddles(left.residual, right.residual) {
            Some(Self { left, right })
        } else {
            None
        }
    }

    /// Returns the bracket bounds as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left.x, self.right.x]
    }

    /// Returns the endpoint residuals as an array.
    #[must_use]
    pub fn residuals(&self) -> [f64; 2] {
        [self.left.residual, self.right.residual]
    }

    /// Returns the midpoint of the bracket.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.left.x + self.right.x)
    }

    /// Returns half the bracket width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        0.5 * (self.right.x - self.left.x)
    }

    /// Replaces one endpoint with `mid`, keeping a sign change inside.
    pub(super) fn shrink(&mut self, mid: Evaluation<I, O>) {
        if straddles(self.left.residual, mid.residual) {
            self.right = mid;
        } else {
            self.left = mid;
        }
    }
}

/// Returns true if two residuals have opposite signs or one of them is zero.
fn straddles(a: f64, b: f64) -> bool {
    a * b <= 0.0
}

/// Finds a bracket with a sign change, falling back to `candidates` in order.
///
/// The caller's `bounds` are tried first. If their residuals share a sign,
/// each candidate is evaluated and the first straddling one is returned.
///
/// # Errors
///
/// Returns [`Error::NoBracket`] (reporting the caller's bounds) if no bracket
/// changes sign, or an evaluation error from the model or problem.
pub fn find<M, P>(
    model: &M,
    problem: &P,
    bounds: Bounds,
    candidates: &Candidates,
) -> Result<Bracket<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    let [left, right] = bounds.as_array();
    let left_eval = evaluate(model, problem, left)?;
    let right_eval = evaluate(model, problem, right)?;
    let left_residual = left_eval.residual;
    let right_residual = right_eval.residual;

    if let Some(bracket) = Bracket::straddling(left_eval, right_eval) {
        return Ok(bracket);
    }

    for candidate in candidates.iter() {
        let [lo, hi] = candidate.as_array();
        let lo_eval = evaluate(model, problem, lo)?;
        let hi_eval = evaluate(model, problem, hi)?;
        if let Some(bracket) = Bracket::straddling(lo_eval, hi_eval) {
            return Ok(bracket);
        }
    }

    Err(Error::NoBracket {
        left,
        right,
        left_residual,
        right_residual,
        candidates: candidates.len(),
    })
}
