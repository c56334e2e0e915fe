use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Registry unavailable at {location}: {message}")]
    RegistryUnavailable { location: String, message: String },

    #[error("Registry at {location} is malformed: {message}")]
    RegistryMalformed { location: String, message: String },

    #[error("Narrative generation failed: {message}")]
    NarrativeError { message: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {message}")]
    InvalidRequest { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Narrative,
    Network,
    Io,
    Data,
    Configuration,
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SkillError {
    pub fn registry_unavailable(location: impl Into<String>, message: impl ToString) -> Self {
        Self::RegistryUnavailable {
            location: location.into(),
            message: message.to_string(),
        }
    }

    pub fn registry_malformed(location: impl Into<String>, message: impl ToString) -> Self {
        Self::RegistryMalformed {
            location: location.into(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RegistryUnavailable { .. } | Self::RegistryMalformed { .. } => {
                ErrorCategory::Registry
            }
            Self::NarrativeError { .. } => ErrorCategory::Narrative,
            Self::ApiError(_) => ErrorCategory::Network,
            Self::IoError(_) => ErrorCategory::Io,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::InvalidRequest { .. } => ErrorCategory::Request,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NarrativeError { .. } => ErrorSeverity::Low,
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::InvalidRequest { .. } | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::High
            }
            Self::RegistryUnavailable { .. }
            | Self::RegistryMalformed { .. }
            | Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 整個調用是否必須中止（無法部分成功）
    pub fn is_fatal(&self) -> bool {
        self.severity() >= ErrorSeverity::High
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::RegistryUnavailable { location, .. } => {
                format!("The course registry could not be retrieved from {}", location)
            }
            Self::RegistryMalformed { location, .. } => {
                format!("The course registry at {} is not valid JSON", location)
            }
            Self::NarrativeError { .. } => "Narrative text could not be generated".to_string(),
            Self::ApiError(_) => "A remote service request failed".to_string(),
            Self::CsvError(_) => "Failed to render the skill table as CSV".to_string(),
            Self::IoError(e) => format!("File operation failed: {}", e),
            Self::SerializationError(e) => format!("Invalid JSON: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::MissingConfigError { field } => format!("Missing setting: {}", field),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            Self::InvalidRequest { message } => format!("Invalid input: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Registry => {
                "Check the registry location and that it contains a JSON array of courses"
            }
            ErrorCategory::Narrative => "Check the narrative endpoint, model and API key",
            ErrorCategory::Network => "Check network connectivity and retry",
            ErrorCategory::Io => "Check that the path exists and is readable",
            ErrorCategory::Data => "Check the input data format",
            ErrorCategory::Configuration => "Review the command-line flags or configuration file",
            ErrorCategory::Request => "Send a body containing a non-empty coursesList",
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
