use std::error::Error as StdError;

use thiserror::Error;

type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors returned by the fixed-step integrator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid step size {dt}: must be finite and positive")]
    InvalidStep { dt: f64 },

    #[error("model error: {0}")]
    Model(#[source] BoxedError),

    #[error("problem error: {0}")]
    Problem(#[source] BoxedError),
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }

    pub(crate) fn problem<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Problem(Box::new(err))
    }
}
