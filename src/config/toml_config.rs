use crate::config::LogFormat;
use crate::core::export::OutputFormat;
use crate::utils::error::{NewtonError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub problem: Option<ProblemConfig>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemConfig {
    pub function: Option<String>,
    pub initial_guess: Option<f64>,
    pub iterations: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub formats: Option<Vec<OutputFormat>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NewtonError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| NewtonError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NEWTON_FUNCTION})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NewtonError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn function(&self) -> Option<&str> {
        self.problem.as_ref()?.function.as_deref()
    }

    pub fn initial_guess(&self) -> Option<f64> {
        self.problem.as_ref()?.initial_guess
    }

    pub fn iterations(&self) -> Option<usize> {
        self.problem.as_ref()?.iterations
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output.as_ref()?.path.as_deref()
    }

    pub fn output_formats(&self) -> Option<&[OutputFormat]> {
        self.output.as_ref()?.formats.as_deref()
    }

    pub fn verbose(&self) -> Option<bool> {
        self.logging.as_ref()?.verbose
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.as_ref()?.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[problem]
function = "x**2 - 2"
initial_guess = 1.0
iterations = 5

[output]
path = "./trace-output"
formats = ["json", "csv"]

[logging]
verbose = true
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.function(), Some("x**2 - 2"));
        assert_eq!(config.initial_guess(), Some(1.0));
        assert_eq!(config.iterations(), Some(5));
        assert_eq!(config.output_path(), Some("./trace-output"));
        assert_eq!(
            config.output_formats(),
            Some(&[OutputFormat::Json, OutputFormat::Csv][..])
        );
        assert_eq!(config.verbose(), Some(true));
        assert_eq!(config.log_format(), Some(LogFormat::Json));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("[problem]\niterations = 3\n").unwrap();
        assert_eq!(config.iterations(), Some(3));
        assert_eq!(config.function(), None);
        assert_eq!(config.output_path(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NEWTON_TRACE_TEST_FUNCTION", "cos(x) - x");

        let toml_content = r#"
[problem]
function = "${NEWTON_TRACE_TEST_FUNCTION}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.function(), Some("cos(x) - x"));

        std::env::remove_var("NEWTON_TRACE_TEST_FUNCTION");
    }

    #[test]
    fn test_unknown_env_var_is_left_untouched() {
        let config =
            TomlConfig::from_toml_str("[output]\npath = \"${NEWTON_TRACE_UNSET_VAR}\"\n").unwrap();
        assert_eq!(config.output_path(), Some("${NEWTON_TRACE_UNSET_VAR}"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[problem\nfunction = 1").unwrap_err();
        assert!(matches!(err, NewtonError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        assert!(TomlConfig::from_toml_str("[output]\nformats = [\"xlsx\"]\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[problem]
function = "exp(x) - 3"
initial_guess = 0.5
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.function(), Some("exp(x) - 3"));
        assert_eq!(config.initial_guess(), Some(0.5));
    }
}
