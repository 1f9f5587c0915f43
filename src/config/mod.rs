#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use settings::RunSettings;
pub use toml_config::TomlConfig;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FUNCTION: &str = "x**3 - 2*x + sin(x)";
pub const DEFAULT_INITIAL_GUESS: f64 = 1.0;
pub const DEFAULT_ITERATIONS: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}
