use crate::utils::error::{EvaluationError, ParseError, Result};
use std::fmt::Display;

/// A real function of one real variable that may fail for some inputs.
pub trait Evaluator: Send + Sync {
    fn eval(&self, x: f64) -> std::result::Result<f64, EvaluationError>;
}

/// Plain closures are accepted as evaluators; non-finite results become errors.
impl<F> Evaluator for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn eval(&self, x: f64) -> std::result::Result<f64, EvaluationError> {
        let y = self(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(EvaluationError::new(x, format!("non-finite result {}", y)))
        }
    }
}

/// Turns formula text into `f` and its analytic derivative `f'`.
pub trait ExpressionCompiler: Send + Sync {
    type Output: Evaluator + Display;

    fn compile(&self, text: &str) -> std::result::Result<(Self::Output, Self::Output), ParseError>;
}

/// Destination for exported files, addressed by relative path.
pub trait Storage: Send + Sync {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn function(&self) -> &str;
    fn initial_guess(&self) -> f64;
    fn iterations(&self) -> usize;
    fn output_path(&self) -> Option<&str>;
}
