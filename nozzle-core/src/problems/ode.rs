/// The state of an ODE system at one point of the independent variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<const N: usize> {
    /// The independent variable (typically time).
    pub x: f64,

    /// The dependent variables, in the same order as the derivative array
    /// returned by [`OdeProblem::derivative`].
    pub y: [f64; N],
}

impl<const N: usize> State<N> {
    pub fn new(x: f64, y: [f64; N]) -> Self {
        Self { x, y }
    }

    /// Advances the state by `dx` along `slope`.
    ///
    /// ```text
    /// y' = y + slope * dx
    /// ```
    #[must_use]
    pub fn step(&self, slope: &[f64; N], dx: f64) -> Self {
        Self {
            x: self.x + dx,
            y: std::array::from_fn(|i| self.y[i] + slope[i] * dx),
        }
    }

    /// Returns `true` if `x` and every dependent variable are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.iter().all(|value| value.is_finite())
    }
}

/// Defines an ODE problem with `N` state variables.
///
/// An ODE problem extracts a [`State`] from model input, computes
/// derivatives from model input and output, and rebuilds model input from a
/// stepped state. Fixed-step integrators use it to advance any
/// [`Model`](crate::Model) in time.
pub trait OdeProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the state from model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be extracted from the input.
    fn state(&self, input: &Self::Input) -> Result<State<N>, Self::Error>;

    /// Computes `dy/dx` from model input and output.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be computed.
    fn derivative(
        &self,
        input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; N], Self::Error>;

    /// Builds model input from a stepped state.
    ///
    /// Called for every state an integrator evaluates, including the
    /// intermediate stages of multi-stage methods.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from the state.
    fn build_input(
        &self,
        base: &Self::Input,
        state: &State<N>,
    ) -> Result<Self::Input, Self::Error>;

    /// Adjusts the input of an accepted step.
    ///
    /// Called once per step, after every stage has been combined. The default
    /// returns the input unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if finalization fails.
    fn finalize_step(&self, next_input: Self::Input) -> Result<Self::Input, Self::Error> {
        Ok(next_input)
    }
}
