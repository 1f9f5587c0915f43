pub mod engine;
pub mod export;
pub mod newton;
pub mod trace;

pub use crate::domain::model::{
    Domain, IterateSequence, NewtonRun, Outcome, Point, TangentSegment, Trace, TraceGeometry,
};
pub use crate::domain::ports::{ConfigProvider, Evaluator, ExpressionCompiler, Storage};
pub use crate::utils::error::Result;
