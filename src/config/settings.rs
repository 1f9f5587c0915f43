use crate::config::{
    LogFormat, TomlConfig, DEFAULT_FUNCTION, DEFAULT_INITIAL_GUESS, DEFAULT_ITERATIONS,
};
use crate::core::engine::MAX_ITERATIONS;
use crate::core::export::OutputFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_finite, validate_non_empty_string, validate_path, validate_range, Validate,
};

/// Fully resolved parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub function: String,
    pub initial_guess: f64,
    pub iterations: usize,
    pub output_path: Option<String>,
    pub formats: Vec<OutputFormat>,
    pub verbose: bool,
    pub log_format: LogFormat,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            function: DEFAULT_FUNCTION.to_string(),
            initial_guess: DEFAULT_INITIAL_GUESS,
            iterations: DEFAULT_ITERATIONS,
            output_path: None,
            formats: vec![OutputFormat::Json],
            verbose: false,
            log_format: LogFormat::Compact,
        }
    }
}

impl RunSettings {
    /// 以設定檔覆蓋預設值
    pub fn from_toml(file: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            function: file
                .function()
                .map(str::to_string)
                .unwrap_or(defaults.function),
            initial_guess: file.initial_guess().unwrap_or(defaults.initial_guess),
            iterations: file.iterations().unwrap_or(defaults.iterations),
            output_path: file.output_path().map(str::to_string),
            formats: file
                .output_formats()
                .map(<[OutputFormat]>::to_vec)
                .unwrap_or(defaults.formats),
            verbose: file.verbose().unwrap_or(defaults.verbose),
            log_format: file.log_format().unwrap_or(defaults.log_format),
        }
    }

    /// 命令列參數優先於設定檔，設定檔優先於預設值
    #[cfg(feature = "cli")]
    pub fn from_sources(cli: &crate::config::CliConfig, file: Option<&TomlConfig>) -> Self {
        let base = file.map(Self::from_toml).unwrap_or_default();
        Self {
            function: cli.function.clone().unwrap_or(base.function),
            initial_guess: cli.x0.unwrap_or(base.initial_guess),
            iterations: cli.iterations.unwrap_or(base.iterations),
            output_path: cli.output_path.clone().or(base.output_path),
            formats: if cli.format.is_empty() {
                base.formats
            } else {
                cli.format.clone()
            },
            verbose: cli.verbose || base.verbose,
            log_format: cli.log_format.unwrap_or(base.log_format),
        }
    }
}

impl ConfigProvider for RunSettings {
    fn function(&self) -> &str {
        &self.function
    }

    fn initial_guess(&self) -> f64 {
        self.initial_guess
    }

    fn iterations(&self) -> usize {
        self.iterations
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("function", &self.function)?;
        validate_finite("x0", self.initial_guess)?;
        validate_range("iterations", self.iterations, 1, MAX_ITERATIONS)?;
        if let Some(path) = &self.output_path {
            validate_path("output_path", path)?;
        }
        Ok(())
    }
}
