//! Fixed-step integrators for ODE problems.
//!
//! Each step extracts the state from the current model input, samples the
//! derivative according to the chosen [`Method`], and rebuilds the input from
//! the stepped state:
//!
//! ```text
//! Euler:           y' = y + k1 * dt
//! Modified Euler:  y' = y + (k1 + k2) * dt / 2
//! Runge-Kutta 4:   y' = y + (k1 + 2 k2 + 2 k3 + k4) * dt / 6
//! ```
//!
//! Intermediate stages go through [`OdeProblem::build_input`] and the model
//! like any other state, so constraints applied there hold at every stage.

mod error;
mod method;
mod solution;

pub use error::Error;
pub use method::{Method, ParseMethodError};
pub use solution::{Solution, Status};

use nozzle_core::{Model, OdeProblem, Snapshot, State};

use crate::equation::Observer;

/// History is preallocated up to this many snapshots and grows past it.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Control actions supported by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current step and return the history so far.
    StopEarly,
}

/// Event emitted after the initial evaluation and after every step.
pub struct Event<'a, I, O> {
    /// Step counter; zero for the initial snapshot.
    pub step: usize,
    /// The snapshot just added to the history.
    pub snapshot: &'a Snapshot<I, O>,
}

/// Integrates an ODE problem for `steps` fixed steps of size `dt`.
///
/// # Algorithm
///
/// 1. Call the model with the initial input and record the snapshot.
/// 2. For each step, combine the stage slopes of `method`, step the state,
///    build and finalize the next input, and call the model.
/// 3. After every recorded snapshot, emit an [`Event`]. An observer may
///    return [`Action::StopEarly`] to end the run there.
///
/// # Errors
///
/// Returns [`Error::InvalidStep`] unless `dt` is finite and positive, or an
/// error if the model or problem fails at any stage.
pub fn solve<I, O, Obs, const N: usize>(
    model: &impl Model<Input = I, Output = O>,
    problem: &impl OdeProblem<N, Input = I, Output = O>,
    initial: I,
    method: Method,
    dt: f64,
    steps: usize,
    mut observer: Obs,
) -> Result<Solution<I, O>, Error>
where
    Obs: for<'a> Observer<Event<'a, I, O>, Action>,
{
    if !dt.is_finite() || dt <= 0.0 {
        return Err(Error::InvalidStep { dt });
    }

    let output = model.call(&initial).map_err(Error::model)?;
    let mut history = Vec::with_capacity(steps.saturating_add(1).min(MAX_PREALLOCATED));
    history.push(Snapshot::new(initial, output));

    for step in 0..=steps {
        if step > 0 {
            let current = &history[history.len() - 1];
            let next = advance(model, problem, current, method, dt)?;
            history.push(next);
        }

        let event = Event {
            step,
            snapshot: &history[history.len() - 1],
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                history,
                steps: step,
            });
        }
    }

    Ok(Solution {
        status: Status::Complete,
        history,
        steps,
    })
}

/// Integrates an ODE problem without observation.
///
/// # Errors
///
/// Returns the same errors as [`solve`].
pub fn solve_unobserved<I, O, const N: usize>(
    model: &impl Model<Input = I, Output = O>,
    problem: &impl OdeProblem<N, Input = I, Output = O>,
    initial: I,
    method: Method,
    dt: f64,
    steps: usize,
) -> Result<Solution<I, O>, Error> {
    solve(model, problem, initial, method, dt, steps, ())
}

/// Takes one step from `current`.
fn advance<M, P, const N: usize>(
    model: &M,
    problem: &P,
    current: &Snapshot<M::Input, M::Output>,
    method: Method,
    dt: f64,
) -> Result<Snapshot<M::Input, M::Output>, Error>
where
    M: Model,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
{
    let state = problem.state(&current.input).map_err(Error::problem)?;
    let k1 = problem
        .derivative(&current.input, &current.output)
        .map_err(Error::problem)?;
    let stage = |at: State<N>| slope_at(model, problem, &current.input, &at);

    let slope = match method {
        Method::Euler => k1,
        Method::ModifiedEuler => {
            let k2 = stage(state.step(&k1, dt))?;
            combine([(0.5, &k1), (0.5, &k2)])
        }
        Method::RungeKutta4 => {
            let half = 0.5 * dt;
            let k2 = stage(state.step(&k1, half))?;
            let k3 = stage(state.step(&k2, half))?;
            let k4 = stage(state.step(&k3, dt))?;
            combine([
                (1.0 / 6.0, &k1),
                (1.0 / 3.0, &k2),
                (1.0 / 3.0, &k3),
                (1.0 / 6.0, &k4),
            ])
        }
    };

    let next = state.step(&slope, dt);
    let input = problem
        .build_input(&current.input, &next)
        .map_err(Error::problem)?;
    let input = problem.finalize_step(input).map_err(Error::problem)?;
    let output = model.call(&input).map_err(Error::model)?;
    Ok(Snapshot::new(input, output))
}

/// Evaluates the derivative at an intermediate stage state.
fn slope_at<M, P, const N: usize>(
    model: &M,
    problem: &P,
    base: &M::Input,
    state: &State<N>,
) -> Result<[f64; N], Error>
where
    M: Model,
    P: OdeProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.build_input(base, state).map_err(Error::problem)?;
    let output = model.call(&input).map_err(Error::model)?;
    problem
        .derivative(&input, &output)
        .map_err(Error::problem)
}

/// Weighted sum of stage slopes.
fn combine<const N: usize, const K: usize>(terms: [(f64, &[f64; N]); K]) -> [f64; N] {
    std::array::from_fn(|i| terms.iter().map(|(weight, k)| weight * k[i]).sum())
}
