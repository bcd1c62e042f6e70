use thiserror::Error;

use nozzle_core::{Model, Snapshot};

use super::EquationProblem;

/// A scalar equation evaluated at one value of its solver variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<I, O> {
    pub x: f64,
    pub residual: f64,
    pub snapshot: Snapshot<I, O>,
}

impl<I, O> Evaluation<I, O> {
    /// Returns true if the residual magnitude is strictly below `tol`.
    #[must_use]
    pub fn is_within(&self, tol: f64) -> bool {
        self.residual.abs() < tol
    }
}

/// Errors that can occur when evaluating a scalar equation.
#[derive(Debug, Error)]
pub enum EvalError<IE, ME, RE> {
    #[error("failed to compute input")]
    Input(#[source] IE),

    #[error("model call failed")]
    Model(#[source] ME),

    #[error("failed to compute residual")]
    Residual(#[source] RE),

    #[error("non-finite residual {residual} at x = {x}")]
    NonFinite { x: f64, residual: f64 },
}

/// Result of [`evaluate`] for a model and problem pair.
pub type EvaluateResult<M, P> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output>,
    EvalError<
        <P as EquationProblem<1>>::InputError,
        <M as Model>::Error,
        <P as EquationProblem<1>>::ResidualError,
    >,
>;

/// Evaluates a scalar equation at `x`.
///
/// # Errors
///
/// Returns an error if the problem rejects `x`, the model call fails, the
/// residual cannot be computed, or the residual is NaN or infinite.
pub fn evaluate<M, P>(model: &M, problem: &P, x: f64) -> EvaluateResult<M, P>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&[x]).map_err(EvalError::Input)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let [residual] = problem
        .residuals(&input, &output)
        .map_err(EvalError::Residual)?;

    if !residual.is_finite() {
        return Err(EvalError::NonFinite { x, residual });
    }

    Ok(Evaluation {
        x,
        residual,
        snapshot: Snapshot::new(input, output),
    })
}
