use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("XLSX processing error: {0}")]
    XlsxError(#[from] calamine::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing input file: {path}")]
    FileNotFound { path: String },

    #[error("Input '{path}' is missing expected column '{column}'. Found: {found:?}")]
    MissingColumn {
        path: String,
        column: String,
        found: Vec<String>,
    },

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

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Verification failed in {stage}: {message}")]
    VerificationError { stage: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Configuration,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn verification(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VerificationError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::FileNotFound { .. }
            | EtlError::MissingColumn { .. }
            | EtlError::CsvError(_)
            | EtlError::XlsxError(_)
            | EtlError::ValidationError { .. } => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } | EtlError::VerificationError { .. } => {
                ErrorCategory::Processing
            }
            EtlError::ZipError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::FileNotFound { .. } => {
                "Check that the raw data directory contains the expected input file"
            }
            EtlError::MissingColumn { .. } => {
                "Check the column name in the configuration against the file header"
            }
            EtlError::CsvError(_) => "Make sure the file is valid CSV with a header row",
            EtlError::XlsxError(_) => "Make sure the workbook is a valid .xlsx file",
            EtlError::ValidationError { .. } => "Inspect the input file for unexpected structure",
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags"
            }
            EtlError::ProcessingError { .. } => "Check that the input contains usable values",
            EtlError::VerificationError { .. } => {
                "The computed summary is inconsistent; inspect the input data"
            }
            EtlError::ZipError(_) | EtlError::SerializationError(_) => {
                "Check that the processed directory is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access a file: {}", self),
            ErrorCategory::Input => format!("The input data could not be read: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Processing => format!("The data could not be processed: {}", self),
            ErrorCategory::Output => format!("The results could not be written: {}", self),
        }
    }

    /// Process exit code for this error, by severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_input_error() {
        let err = EtlError::FileNotFound {
            path: "data/raw/astros.json".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("data/raw/astros.json"));
    }

    #[test]
    fn test_config_error_exit_code() {
        let err = EtlError::InvalidConfigValueError {
            field: "sales.limit".to_string(),
            value: "abc".to_string(),
            reason: "not a number".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().starts_with("The configuration is invalid"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: EtlError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
    }
}
