use std::io::{self, Write};

use nozzle_core::Observer;
use nozzle_gas::{Rejection, ScanEvent};
use nozzle_solve::equation::bisection::Action;

/// Observer that writes root-scan progress as plain text lines.
///
/// Tracing never changes solver results. The first failed write is kept and
/// later events are dropped instead of being written.
#[derive(Debug)]
pub struct Trace<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> Trace<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns the write error that stopped tracing, if any.
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<'a, W: Write> Observer<ScanEvent<'a>, Action> for Trace<W> {
    fn observe(&mut self, event: &ScanEvent<'a>) -> Option<Action> {
        if self.error.is_some() {
            return None;
        }

        let written = match event {
            ScanEvent::Iteration { interval, event } => writeln!(
                self.out,
                "[{}, {}] iter {}: bracket [{:.10}, {:.10}], M = {:.10}, residual = {:.3e}",
                interval[0],
                interval[1],
                event.iter,
                event.bracket[0],
                event.bracket[1],
                event.eval.x,
                event.eval.residual,
            ),
            ScanEvent::Skipped { interval, error } => writeln!(
                self.out,
                "[{}, {}] skipped: {error}",
                interval[0], interval[1]
            ),
            ScanEvent::Rejected {
                interval,
                mach,
                residual,
                reason,
            } => {
                let why = match reason {
                    Rejection::Duplicate => "duplicate",
                    Rejection::Inaccurate => "inaccurate",
                };
                writeln!(
                    self.out,
                    "[{}, {}] rejected M = {mach:.10} ({why}, residual = {residual:.3e})",
                    interval[0], interval[1]
                )
            }
            ScanEvent::Accepted { interval, root } => writeln!(
                self.out,
                "[{}, {}] accepted M = {:.10} after {} iterations ({})",
                interval[0], interval[1], root.mach, root.iters, root.status
            ),
        };
        if let Err(err) = written {
            self.error = Some(err);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nozzle_gas::{RootFinder, diameter};

    #[test]
    fn traces_iterations_and_outcomes() {
        let finder = RootFinder::default();
        let mut trace = Trace::new(Vec::new());

        let set = finder.find_roots_observed(&diameter(0.2).unwrap(), |event: &ScanEvent<'_>| {
            trace.observe(event)
        });
        let text = String::from_utf8(trace.into_inner()).unwrap();

        assert_eq!(set.len(), 2);
        assert!(text.starts_with("[0.01, 0.99] iter 1: bracket [0.0100000000, 0.9900000000]"));
        assert!(text.contains("[0.01, 0.99] accepted M = 0.36471"));
        assert!(text.contains("[1.01, 10] accepted M = 1.95078"));
    }

    #[test]
    fn traces_skipped_intervals() {
        let finder = RootFinder::default();
        let mut trace = Trace::new(Vec::new());

        finder.find_roots_observed(&diameter(0.1).unwrap(), |event: &ScanEvent<'_>| {
            trace.observe(event)
        });
        let text = String::from_utf8(trace.into_inner()).unwrap();

        assert!(text.contains("[0.01, 0.99] skipped: no root in bracket"));
        assert!(text.contains("[1.01, 10] skipped: no root in bracket"));
    }

    /// Writer that fails every write and counts the attempts.
    struct Closed {
        attempts: usize,
    }

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stops_writing_after_first_failure() {
        let finder = RootFinder::default();
        let mut trace = Trace::new(Closed { attempts: 0 });

        let set = finder.find_roots_observed(&diameter(0.2).unwrap(), |event: &ScanEvent<'_>| {
            trace.observe(event)
        });

        assert_eq!(set.len(), 2);
        assert_eq!(
            trace.error().map(io::Error::kind),
            Some(io::ErrorKind::BrokenPipe)
        );
        assert_eq!(trace.into_inner().attempts, 1);
    }

    #[test]
    fn clean_trace_has_no_error() {
        let finder = RootFinder::default();
        let mut trace = Trace::new(Vec::new());

        finder.find_roots_observed(&diameter(0.2).unwrap(), |event: &ScanEvent<'_>| {
            trace.observe(event)
        });
        assert!(trace.error().is_none());
    }
}
