//! Ordered pipeline of fallible steps.
//!
//! Each step declares a [`Severity`]. A fatal failure stops the pipeline and
//! propagates; a tolerated failure is recorded and the next step runs.

use crate::error::BootstrapError;

/// How a step's failure is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort the whole bootstrap.
    Fatal,
    /// Swallow the error and continue.
    Tolerated,
}

/// What a successful step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Done,
    /// The step had nothing to do.
    Skipped,
}

/// A named unit of work over a shared context.
pub struct Step<C> {
    pub name: &'static str,
    pub severity: Severity,
    pub run: fn(&mut C) -> Result<Progress, BootstrapError>,
}

impl<C> Step<C> {
    pub fn fatal(name: &'static str, run: fn(&mut C) -> Result<Progress, BootstrapError>) -> Self {
        Self {
            name,
            severity: Severity::Fatal,
            run,
        }
    }

    pub fn tolerated(
        name: &'static str,
        run: fn(&mut C) -> Result<Progress, BootstrapError>,
    ) -> Self {
        Self {
            name,
            severity: Severity::Tolerated,
            run,
        }
    }
}

/// Final state of a step that did not abort the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Skipped,
    /// Failed, but the step is tolerated. Holds the error text.
    Tolerated(String),
}

/// One line of the pipeline's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: &'static str,
    pub status: StepStatus,
}

/// Run `steps` in order over `ctx`, stopping at the first fatal failure.
pub fn run_steps<C>(steps: &[Step<C>], ctx: &mut C) -> Result<Vec<StepRecord>, BootstrapError> {
    let mut records = Vec::with_capacity(steps.len());

    for step in steps {
        let status = match ((step.run)(ctx), step.severity) {
            (Ok(Progress::Done), _) => StepStatus::Done,
            (Ok(Progress::Skipped), _) => StepStatus::Skipped,
            (Err(e), Severity::Tolerated) => {
                tracing::debug!(step = step.name, error = %e, "Tolerated step failure");
                StepStatus::Tolerated(e.to_string())
            }
            (Err(e), Severity::Fatal) => return Err(e),
        };
        tracing::debug!(step = step.name, status = ?status, "Step finished");
        records.push(StepRecord {
            name: step.name,
            status,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Trace(Vec<&'static str>);

    fn failure() -> BootstrapError {
        BootstrapError::CreateDataDir {
            path: PathBuf::from("/x"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
    }

    fn ok_a(t: &mut Trace) -> Result<Progress, BootstrapError> {
        t.0.push("a");
        Ok(Progress::Done)
    }

    fn fail_b(t: &mut Trace) -> Result<Progress, BootstrapError> {
        t.0.push("b");
        Err(failure())
    }

    fn skip_c(t: &mut Trace) -> Result<Progress, BootstrapError> {
        t.0.push("c");
        Ok(Progress::Skipped)
    }

    #[test]
    fn test_tolerated_failure_continues() {
        let steps = [
            Step::fatal("a", ok_a),
            Step::tolerated("b", fail_b),
            Step::fatal("c", skip_c),
        ];
        let mut trace = Trace::default();
        let records = run_steps(&steps, &mut trace).unwrap();

        assert_eq!(trace.0, ["a", "b", "c"]);
        assert_eq!(records[0].status, StepStatus::Done);
        assert!(matches!(records[1].status, StepStatus::Tolerated(_)));
        assert_eq!(records[2].status, StepStatus::Skipped);
    }

    #[test]
    fn test_fatal_failure_short_circuits() {
        let steps = [
            Step::fatal("a", ok_a),
            Step::fatal("b", fail_b),
            Step::fatal("c", skip_c),
        ];
        let mut trace = Trace::default();
        let err = run_steps(&steps, &mut trace).unwrap_err();

        assert!(matches!(err, BootstrapError::CreateDataDir { .. }));
        assert_eq!(trace.0, ["a", "b"]);
    }
}
