/// A deterministic computation from a typed input to a typed output.
///
/// Solvers call models repeatedly while searching, so `call` must return the
/// same result for the same input.
pub trait Model {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates the model at `input`.
    ///
    /// # Errors
    ///
    /// Returns the model's own error type when `input` cannot be evaluated.
    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// A model input paired with the output it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> Snapshot<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}
