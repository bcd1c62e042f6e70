mod evaluate;

pub mod bisection;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};
pub use nozzle_core::{EquationProblem, Observer};
