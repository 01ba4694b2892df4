use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Storage {operation} failed for '{key}': {message}")]
    StorageError {
        operation: String,
        key: String,
        message: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {}", fields.join(", "))]
    MissingConfigError { fields: Vec<String> },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    RemoteEndpoint,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn storage(operation: &str, key: &str, message: impl std::fmt::Display) -> Self {
        EtlError::StorageError {
            operation: operation.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::StorageError { .. } => ErrorCategory::Storage,
            EtlError::ApiError(_) | EtlError::DatabaseError { .. } => {
                ErrorCategory::RemoteEndpoint
            }
            EtlError::CsvError(_) => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::RemoteEndpoint => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingConfigError { fields } => format!(
                "Missing required settings: {}. Set them in the environment, a .env file or the --config file.",
                fields.join(", ")
            ),
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid: {}", field, reason)
            }
            EtlError::StorageError { operation, key, .. } => {
                format!("Object storage could not {} '{}'", operation, key)
            }
            EtlError::DatabaseError { .. } => "The database could not be reached".to_string(),
            EtlError::ApiError(_) => "The web service could not be reached".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Check the settings named above and run again",
            ErrorCategory::Storage => {
                "Check bucket name, credentials and network access; pending files are left in place"
            }
            ErrorCategory::RemoteEndpoint => {
                "Check the endpoint is reachable; the item stays pending for the next run"
            }
            ErrorCategory::Data => "Inspect the input file; rejected rows are in the *_error.csv output",
            ErrorCategory::System => "Check local disk space and directory permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
