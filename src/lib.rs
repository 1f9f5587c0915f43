pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::expression::{CompiledExpression, SymbolicCompiler};
pub use adapters::storage::LocalStorage;
pub use config::{RunSettings, TomlConfig};
pub use core::engine::{compute, NewtonEngine};
pub use core::export::{OutputFormat, TraceExporter};
pub use core::newton::iterate;
pub use core::trace::build_trace;
pub use domain::model::{IterateSequence, Outcome, Trace};
pub use utils::error::{NewtonError, Result};
