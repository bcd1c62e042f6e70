use std::error::Error as StdError;

use thiserror::Error;

use crate::equation::EvalError;

use super::BoundsError;

type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors returned by the bisection solver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid bracket: {0}")]
    InvalidBounds(#[from] BoundsError),

    /// Neither the bracket nor any fallback candidate changes sign.
    ///
    /// The endpoints and residuals are those of the caller's bracket.
    #[error(
        "no root in bracket: f({left})={left_residual}, f({right})={right_residual} \
         ({candidates} fallback brackets tried)"
    )]
    NoBracket {
        left: f64,
        right: f64,
        left_residual: f64,
        right_residual: f64,
        candidates: usize,
    },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("problem rejected the solver variable")]
    Input(#[source] BoxedError),

    #[error("model call failed")]
    Model(#[source] BoxedError),

    #[error("failed to compute residual")]
    Residual(#[source] BoxedError),

    #[error("non-finite residual {residual} at x = {x}")]
    NonFiniteResidual { x: f64, residual: f64 },
}

impl<IE, ME, RE> From<EvalError<IE, ME, RE>> for Error
where
    IE: StdError + Send + Sync + 'static,
    ME: StdError + Send + Sync + 'static,
    RE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<IE, ME, RE>) -> Self {
        match err {
            EvalError::Input(source) => Self::Input(source.into()),
            EvalError::Model(source) => Self::Model(source.into()),
            EvalError::Residual(source) => Self::Residual(source.into()),
            EvalError::NonFinite { x, residual } => Self::NonFiniteResidual { x, residual },
        }
    }
}
