//! Plain-text summary of a [`Trace`] for the terminal.

use crate::domain::model::{Outcome, Trace};
use std::fmt;

/// Renders f, f', the iterate table, the plot range and the outcome line.
pub struct TraceSummary<'a>(pub &'a Trace);

impl fmt::Display for TraceSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trace = self.0;
        let domain = trace.domain();

        writeln!(f, "f(x)  = {}", trace.formula)?;
        writeln!(f, "f'(x) = {}", trace.derivative)?;
        writeln!(f)?;
        writeln!(f, "{:>4}  {:>24}  {:>24}", "step", "x", "f(x)")?;
        for (step, (x, fx)) in trace.iterates.iter().zip(trace.residuals()).enumerate() {
            writeln!(f, "{:>4}  {:>24.16e}  {:>24.16e}", step, x, fx)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "plot range [{}, {}], {} curve samples, {} tangents",
            domain.lo,
            domain.hi,
            trace.curve_sample().len(),
            trace.tangents().len()
        )?;

        let marker = match trace.outcome {
            Outcome::Completed { .. } => "✅",
            Outcome::Stalled { .. } => "⚠️",
        };
        writeln!(f, "{} {}", marker, trace.message())
    }
}
