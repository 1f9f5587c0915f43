use crate::config::LogFormat;
use crate::core::export::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Anything left unset falls back to the config file, then to defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "newton-trace")]
#[command(about = "Newton-Raphson root finding with a plottable convergence trace")]
pub struct CliConfig {
    /// Function of x, e.g. "x**3 - 2*x + sin(x)"
    #[arg(short, long)]
    pub function: Option<String>,

    /// Initial guess x0
    #[arg(long, allow_hyphen_values = true)]
    pub x0: Option<f64>,

    /// Number of Newton iterations (1-20)
    #[arg(short = 'n', long)]
    pub iterations: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for exported trace files; nothing is written when omitted
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Export formats
    #[arg(long, value_enum, value_delimiter = ',')]
    pub format: Vec<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log layout
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}
