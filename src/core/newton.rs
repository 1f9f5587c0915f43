use crate::domain::model::{IterateSequence, NewtonRun};
use crate::domain::ports::Evaluator;
use crate::utils::error::{EvaluationError, NewtonError, Result, StallError};

/// Runs exactly `max_steps` Newton-Raphson steps from `x0`.
///
/// The loop stops early only when `f'` is exactly zero; the returned
/// [`NewtonRun`] then carries the truncated sequence and a [`StallError`]
/// naming the stalling iterate. Evaluation failures, including a step that
/// overflows to a non-finite iterate, abort the run.
pub fn iterate<F, D>(f: &F, f_prime: &D, x0: f64, max_steps: usize) -> Result<NewtonRun>
where
    F: Evaluator + ?Sized,
    D: Evaluator + ?Sized,
{
    if max_steps == 0 {
        return Err(NewtonError::invalid_parameter(
            "max_steps",
            "at least one iteration is required",
        ));
    }
    if !x0.is_finite() {
        return Err(NewtonError::invalid_parameter(
            "x0",
            format!("initial guess must be finite, got {}", x0),
        ));
    }

    let mut iterates = IterateSequence::starting_at(x0);
    let mut current = x0;

    for step in 1..=max_steps {
        let slope = f_prime.eval(current)?;
        if slope == 0.0 {
            let stall = StallError { at: current, step };
            tracing::debug!("{}", stall);
            return Ok(NewtonRun {
                iterates,
                stall: Some(stall),
            });
        }

        let value = f.eval(current)?;
        let next = current - value / slope;
        if !next.is_finite() {
            return Err(EvaluationError::new(
                current,
                format!("newton step diverged (f = {}, f' = {})", value, slope),
            )
            .into());
        }

        tracing::debug!(
            "step {}: x = {}, f(x) = {}, f'(x) = {} -> {}",
            step,
            current,
            value,
            slope,
            next
        );

        iterates.push(next);
        current = next;
    }

    Ok(NewtonRun {
        iterates,
        stall: None,
    })
}
