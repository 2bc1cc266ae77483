use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("FileName : {file_name} does not contain any record.")]
    EmptyFileError { file_name: String },

    #[error(
        "FileName : {file_name} is in unsupported file format. Supported file format is \"{allowed}\"."
    )]
    UnsupportedFormatError {
        file_name: String,
        extension: String,
        allowed: String,
    },

    #[error("Failed to load {path}: {message}")]
    LoadError { path: String, message: String },

    #[error("Record classification failed: {message}")]
    ClassificationError { message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("Failed to move {from} to {to}: {message}")]
    RelocationError {
        from: String,
        to: String,
        message: String,
    },

    #[error("Notification request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Processing,
    Storage,
    Notification,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::EmptyFileError { .. } | EtlError::UnsupportedFormatError { .. } => {
                ErrorCategory::Validation
            }
            EtlError::LoadError { .. }
            | EtlError::ClassificationError { .. }
            | EtlError::CsvError(_) => ErrorCategory::Processing,
            EtlError::WriteError { .. } | EtlError::RelocationError { .. } => {
                ErrorCategory::Storage
            }
            EtlError::ApiError(_) => ErrorCategory::Notification,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Notification => ErrorSeverity::Medium,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::EmptyFileError { file_name } => {
                format!("The uploaded file {} has no records", file_name)
            }
            EtlError::UnsupportedFormatError {
                file_name,
                extension,
                ..
            } => format!(
                "The uploaded file {} has an unsupported type (.{})",
                file_name, extension
            ),
            EtlError::LoadError { path, .. } => {
                format!("The file {} could not be read as a table", path)
            }
            EtlError::WriteError { path, .. } => format!("Could not write output to {}", path),
            EtlError::RelocationError { from, .. } => format!("Could not move {}", from),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => {
                "Upload a non-empty file with a supported extension and rerun the job"
            }
            ErrorCategory::Processing => "Check that the file is a well-formed delimited table",
            ErrorCategory::Storage => {
                "Check that the destination directories exist and are writable"
            }
            ErrorCategory::Notification => "Check the notification endpoint and API key",
            ErrorCategory::Configuration => "Fix the configuration file or CLI flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
