use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No data to {operation}")]
    NoData { operation: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unsupported input '{path}': {reason}")]
    UnsupportedInputError { path: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn no_data(operation: &str) -> Self {
        Self::NoData {
            operation: operation.to_string(),
        }
    }

    /// True for the empty-collection refusal, which callers report and move past.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoData { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::UnsupportedInputError { .. } => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::Io,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoData { .. } => ErrorSeverity::Low,
            Self::CsvError(_) | Self::SerializationError(_) | Self::UnsupportedInputError { .. } => {
                ErrorSeverity::High
            }
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::NoData { .. } => {
                "Check the input file or loosen the filters before exporting".to_string()
            }
            Self::CsvError(_) => "Make sure the input CSV has a header row and consistent columns".to_string(),
            Self::IoError(_) => "Check that the input file exists and the output directory is writable".to_string(),
            Self::SerializationError(_) => "Make sure the input JSON is an array of objects".to_string(),
            Self::UnsupportedInputError { .. } => "Use a .json or .csv input file".to_string(),
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the TOML configuration file".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => format!("Fix the value of '{}'", field),
            Self::MissingConfigError { field } => format!("Provide a value for '{}'", field),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NoData { operation } => format!("Nothing to {}: the record collection is empty", operation),
            Self::IoError(e) => format!("Could not read or write a file ({})", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
