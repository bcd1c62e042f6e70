mod equation;
mod ode;

pub use equation::EquationProblem;
pub use ode::{OdeProblem, State};
