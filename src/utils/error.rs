use serde::Serialize;
use thiserror::Error;

/// 公式無法解析為單一變數 `x` 的函數
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("cannot parse '{text}': {cause}")]
pub struct ParseError {
    pub text: String,
    pub cause: String,
}

impl ParseError {
    pub fn new(text: &str, cause: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            cause: cause.into(),
        }
    }
}

/// f 或 f' 在某個輸入值上沒有產生有限的數值
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("evaluation failed at x = {input}: {cause}")]
pub struct EvaluationError {
    pub input: f64,
    pub cause: String,
}

impl EvaluationError {
    pub fn new(input: f64, cause: impl Into<String>) -> Self {
        Self {
            input,
            cause: cause.into(),
        }
    }
}

/// The derivative vanished exactly, so the next Newton step is undefined.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("f'({at}) = 0 at step {step}: division by zero, iteration stopped")]
pub struct StallError {
    pub at: f64,
    pub step: usize,
}

#[derive(Error, Debug)]
pub enum NewtonError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Numeric,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl NewtonError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        NewtonError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            NewtonError::Parse(_) | NewtonError::InvalidParameter { .. } => ErrorCategory::Input,
            NewtonError::Evaluation(_) => ErrorCategory::Numeric,
            NewtonError::ConfigError { .. }
            | NewtonError::ConfigValidationError { .. }
            | NewtonError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            NewtonError::IoError(_)
            | NewtonError::SerializationError(_)
            | NewtonError::CsvError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 使用者修正輸入後即可重試
            ErrorCategory::Input | ErrorCategory::Numeric => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            NewtonError::Parse(_) => {
                "Check the formula syntax, e.g. 'x**3 - 2*x + sin(x)'. Only the variable x is allowed".to_string()
            }
            NewtonError::Evaluation(e) => format!(
                "The function is undefined or overflows near x = {}. Try another initial guess",
                e.input
            ),
            NewtonError::InvalidParameter { name, .. } => {
                format!("Adjust '{}' and run again", name)
            }
            NewtonError::IoError(_) => "Check that the output directory is writable".to_string(),
            NewtonError::SerializationError(_) | NewtonError::CsvError(_) => {
                "Export failed; retry with a different output format".to_string()
            }
            NewtonError::ConfigError { .. } | NewtonError::ConfigValidationError { .. } => {
                "Make sure the configuration file exists and is valid TOML".to_string()
            }
            NewtonError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NewtonError::Parse(e) => format!("Error in the function '{}': {}", e.text, e.cause),
            NewtonError::Evaluation(e) => {
                format!("Cannot evaluate the function at x = {}: {}", e.input, e.cause)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NewtonError>;
