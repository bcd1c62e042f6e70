mod bracket;
mod config;
mod error;
mod solution;

pub use bracket::{
    Bounds, BoundsError, Bracket, Candidates, DEFAULT_INNER_BOUNDS, DEFAULT_OUTER_BOUNDS, find,
};
pub use config::Config;
pub use error::Error;
pub use solution::{Solution, Status};

use nozzle_core::Model;

use crate::equation::{EquationProblem, Evaluation, Observer, evaluate};

/// Control actions supported by the bisection solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver and report the current midpoint.
    StopEarly,
}

/// Iteration event emitted by the bisection solver.
pub struct Event<'a, I, O> {
    /// Iteration counter (1-based within the bisection loop).
    pub iter: usize,
    /// Current search bracket.
    pub bracket: [f64; 2],
    /// Evaluation at the current midpoint.
    pub eval: &'a Evaluation<I, O>,
}

/// Finds a root of the equation using the bisection method.
/// Observers see each iteration's evaluation and bracket state.
///
/// Only the given bracket is tried; see [`solve_with_fallback`] to search
/// candidate brackets when it shows no sign change.
///
/// # Errors
///
/// Returns an error if the bracket is invalid or does not change sign, the
/// config is invalid, or the model or problem fails during evaluation.
pub fn solve<I, O, Obs>(
    model: &impl Model<Input = I, Output = O>,
    problem: &impl EquationProblem<1, Input = I, Output = O>,
    bracket: [f64; 2],
    config: &Config,
    observer: Obs,
) -> Result<Solution<I, O>, Error>
where
    Obs: for<'a> Observer<Event<'a, I, O>, Action>,
{
    solve_with_fallback(
        model,
        problem,
        bracket,
        &Candidates::none(),
        config,
        observer,
    )
}

/// Finds a root using bisection, searching `candidates` in order when the
/// given bracket does not change sign.
///
/// # Errors
///
/// Returns [`Error::NoBracket`] if neither the bracket nor any candidate
/// changes sign, plus the same errors as [`solve`].
pub fn solve_with_fallback<I, O, Obs>(
    model: &impl Model<Input = I, Output = O>,
    problem: &impl EquationProblem<1, Input = I, Output = O>,
    bracket: [f64; 2],
    candidates: &Candidates,
    config: &Config,
    observer: Obs,
) -> Result<Solution<I, O>, Error>
where
    Obs: for<'a> Observer<Event<'a, I, O>, Action>,
{
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    let bounds = Bounds::new(bracket)?;
    let bracket = find(model, problem, bounds, candidates)?;

    bisect(model, problem, bracket, config, observer)
}

/// Runs bisection without observation.
///
/// # Errors
///
/// Returns the same errors as [`solve`].
pub fn solve_unobserved<I, O>(
    model: &impl Model<Input = I, Output = O>,
    problem: &impl EquationProblem<1, Input = I, Output = O>,
    bracket: [f64; 2],
    config: &Config,
) -> Result<Solution<I, O>, Error> {
    solve(model, problem, bracket, config, ())
}

/// Halves a validated bracket until a tolerance is met or the budget runs out.
fn bisect<I, O, Obs>(
    model: &impl Model<Input = I, Output = O>,
    problem: &impl EquationProblem<1, Input = I, Output = O>,
    mut bracket: Bracket<I, O>,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<I, O>, Error>
where
    Obs: for<'a> Observer<Event<'a, I, O>, Action>,
{
    if bracket.left.is_within(config.residual_tol) {
        return Ok(Solution::from_eval(bracket.left, Status::Converged, 0));
    }
    if bracket.right.is_within(config.residual_tol) {
        return Ok(Solution::from_eval(bracket.right, Status::Converged, 0));
    }

    for iter in 1..=config.max_iters {
        let mid_eval = evaluate(model, problem, bracket.midpoint())?;

        let event = Event {
            iter,
            bracket: bracket.as_array(),
            eval: &mid_eval,
        };

        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution::from_eval(
                mid_eval,
                Status::StoppedByObserver,
                iter,
            ));
        }

        if mid_eval.is_within(config.residual_tol) || bracket.half_width() < config.x_tol {
            return Ok(Solution::from_eval(mid_eval, Status::Converged, iter));
        }

        bracket.shrink(mid_eval);
    }

    let mid_eval = evaluate(model, problem, bracket.midpoint())?;
    Ok(Solution::from_eval(
        mid_eval,
        Status::MaxIters,
        config.max_iters,
    ))
}
