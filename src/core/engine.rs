use crate::adapters::expression::SymbolicCompiler;
use crate::core::newton::iterate;
use crate::core::trace::build_trace;
use crate::domain::model::{Outcome, Trace};
use crate::domain::ports::ExpressionCompiler;
use crate::utils::error::Result;
use crate::utils::validation::{validate_finite, validate_non_empty_string, validate_range};

/// Largest iteration count accepted from callers.
pub const MAX_ITERATIONS: usize = 20;

pub struct NewtonEngine<C: ExpressionCompiler> {
    compiler: C,
}

impl Default for NewtonEngine<SymbolicCompiler> {
    fn default() -> Self {
        Self::new(SymbolicCompiler)
    }
}

impl<C: ExpressionCompiler> NewtonEngine<C> {
    pub fn new(compiler: C) -> Self {
        Self { compiler }
    }

    /// One full compute cycle: compile, iterate, build the plot trace.
    ///
    /// A zero derivative is not an error here; the returned trace then has
    /// [`Outcome::Stalled`] and the iterates computed before the stall.
    pub fn compute(&self, formula: &str, x0: f64, max_steps: usize) -> Result<Trace> {
        validate_non_empty_string("function", formula)?;
        validate_finite("initial_guess", x0)?;
        validate_range("iterations", max_steps, 1, MAX_ITERATIONS)?;

        tracing::info!(
            "🔍 Newton-Raphson on f(x) = {} from x0 = {} ({} iterations)",
            formula,
            x0,
            max_steps
        );

        let (f, f_prime) = self.compiler.compile(formula)?;
        tracing::debug!("f'(x) = {}", f_prime);

        let run = iterate(&f, &f_prime, x0, max_steps)?;
        let geometry = build_trace(&run.iterates, &f)?;

        let last_iterate = run.iterates.last();
        let outcome = match run.stall {
            Some(stall) => Outcome::Stalled {
                stall,
                last_iterate,
            },
            None => Outcome::Completed {
                final_iterate: last_iterate,
            },
        };

        let trace = Trace {
            formula: formula.to_string(),
            derivative: f_prime.to_string(),
            requested_steps: max_steps,
            iterates: run.iterates,
            geometry,
            outcome,
        };

        if trace.outcome.is_stalled() {
            tracing::warn!("⚠️ {}", trace.message());
        } else {
            tracing::info!("✅ {}", trace.message());
        }

        Ok(trace)
    }
}

/// [`NewtonEngine::compute`] with the bundled symbolic compiler.
pub fn compute(formula: &str, x0: f64, max_steps: usize) -> Result<Trace> {
    NewtonEngine::<SymbolicCompiler>::default().compute(formula, x0, max_steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Evaluator;
    use crate::utils::error::{EvaluationError, NewtonError, ParseError};
    use std::fmt;

    /// Compiler stub that ignores the text and returns `x - 4` with a constant slope.
    struct LinearCompiler;

    struct Linear {
        slope: bool,
    }

    impl Evaluator for Linear {
        fn eval(&self, x: f64) -> std::result::Result<f64, EvaluationError> {
            Ok(if self.slope { 1.0 } else { x - 4.0 })
        }
    }

    impl fmt::Display for Linear {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", if self.slope { "1" } else { "x - 4" })
        }
    }

    impl ExpressionCompiler for LinearCompiler {
        type Output = Linear;

        fn compile(&self, text: &str) -> std::result::Result<(Linear, Linear), ParseError> {
            if text == "bad" {
                return Err(ParseError::new(text, "rejected"));
            }
            Ok((Linear { slope: false }, Linear { slope: true }))
        }
    }

    #[test]
    fn test_engine_uses_injected_compiler() {
        let engine = NewtonEngine::new(LinearCompiler);
        let trace = engine.compute("anything", 0.0, 3).unwrap();

        assert_eq!(trace.iterates.as_slice(), &[0.0, 4.0, 4.0, 4.0]);
        assert_eq!(trace.derivative, "1");
        assert_eq!(trace.outcome, Outcome::Completed { final_iterate: 4.0 });
    }

    #[test]
    fn test_parse_failure_stops_before_iteration() {
        let engine = NewtonEngine::new(LinearCompiler);
        assert!(matches!(
            engine.compute("bad", 0.0, 3),
            Err(NewtonError::Parse(_))
        ));
    }

    #[test]
    fn test_parameters_are_validated() {
        assert!(compute("", 1.0, 3).is_err());
        assert!(compute("x", f64::INFINITY, 3).is_err());
        assert!(compute("x", 1.0, 0).is_err());
        assert!(compute("x", 1.0, MAX_ITERATIONS + 1).is_err());
    }

    #[test]
    fn test_stall_yields_partial_trace() {
        let trace = compute("x**2", 0.0, 5).unwrap();

        assert_eq!(trace.iterates.as_slice(), &[0.0]);
        assert!(trace.tangents().is_empty());
        assert_eq!(trace.domain().width(), 10.0);
        assert!(trace.message().contains("f'(0) = 0"));
    }

    #[test]
    fn test_stall_is_warned_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct WarnCounter(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for WarnCounter {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

        let trace = tracing::subscriber::with_default(subscriber, || {
            compute("x**2", 0.0, 5).unwrap()
        });

        assert!(matches!(trace.outcome, Outcome::Stalled { .. }));
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }
}
