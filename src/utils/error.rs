use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No report selected")]
    NoReportSelected,

    #[error("No columns selected for report '{report}'")]
    EmptyColumnSelection { report: String },

    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },

    /// 非致命：轉換階段會直接輸出原始值
    #[error("Malformed date value in '{field}': {value}")]
    MalformedDateValue { field: String, value: String },

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Selection,
    Data,
    Configuration,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoReportSelected | Self::EmptyColumnSelection { .. } | Self::UnknownReport(_) => {
                ErrorCategory::Selection
            }
            Self::DataUnavailable { .. } | Self::ApiError(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::Io,
            Self::MalformedDateValue { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Processing if matches!(self, Self::MalformedDateValue { .. }) => {
                ErrorSeverity::Low
            }
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Selection | ErrorCategory::Configuration | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NoReportSelected => "Please choose a report before exporting.".to_string(),
            Self::EmptyColumnSelection { report } => {
                format!("Select at least one column for the '{}' report.", report)
            }
            Self::DataUnavailable { .. } | Self::ApiError(_) => {
                "The report data could not be loaded.".to_string()
            }
            Self::UnknownReport(id) => format!("'{}' is not an available report.", id),
            Self::MalformedDateValue { field, value } => {
                format!("Date '{}' in '{}' was exported as-is.", value, field)
            }
            Self::IoError(e) => format!("The export file could not be written: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NoReportSelected | Self::UnknownReport(_) => {
                "Run with --list to see the available reports"
            }
            Self::EmptyColumnSelection { .. } => "Pass --columns with at least one field name",
            Self::DataUnavailable { .. } | Self::ApiError(_) => {
                "Check the data service connection and try the export again"
            }
            Self::MalformedDateValue { .. } => "Correct the source date in the data service",
            Self::IoError(_) => "Check that the output path exists and is writable",
            Self::CsvError(_) | Self::SerializationError(_) => "Re-run with --verbose for details",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ValidationError { .. } => "Review the configuration file and CLI arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
