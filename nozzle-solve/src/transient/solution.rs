use nozzle_core::Snapshot;

/// How an integration run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every requested step was taken.
    Complete,
    /// An observer returned [`Action::StopEarly`](super::Action::StopEarly).
    StoppedByObserver,
}

/// The history of an integration run.
#[derive(Debug, Clone)]
pub struct Solution<I, O> {
    pub status: Status,
    /// One snapshot per accepted step, starting with the initial input.
    pub history: Vec<Snapshot<I, O>>,
    /// Steps taken.
    pub steps: usize,
}

impl<I, O> Solution<I, O> {
    /// Returns the last accepted snapshot.
    ///
    /// The history always holds the initial snapshot, so this never fails
    /// for a solution returned by [`solve`](super::solve).
    #[must_use]
    pub fn last(&self) -> Option<&Snapshot<I, O>> {
        self.history.last()
    }
}
