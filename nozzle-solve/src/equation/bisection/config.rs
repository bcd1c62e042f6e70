/// Configuration for the bisection solver.
///
/// The solver converges when the midpoint residual magnitude drops below
/// `residual_tol` or the bracket half-width drops below `x_tol`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub max_iters: usize,
    pub x_tol: f64,
    pub residual_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 1000,
            x_tol: 1e-10,
            residual_tol: 1e-10,
        }
    }
}

impl Config {
    /// Validates that all tolerances are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.x_tol.is_finite() || self.x_tol < 0.0 {
            return Err("x_tol must be finite and non-negative");
        }
        if !self.residual_tol.is_finite() || self.residual_tol < 0.0 {
            return Err("residual_tol must be finite and non-negative");
        }
        Ok(())
    }
}
