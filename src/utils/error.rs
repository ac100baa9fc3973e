use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream {endpoint} responded with status {status}")]
    UpstreamStatusError { endpoint: String, status: u16 },

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

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Notification delivery failed: {message}")]
    NotificationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::UpstreamStatusError { .. } => ErrorCategory::Network,
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::SerializationError(_) => ErrorCategory::Data,
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::NotificationError { .. } => ErrorCategory::Delivery,
        }
    }

    /// 嚴重程度同時決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and that the API base URL is reachable".to_string()
            }
            EtlError::UpstreamStatusError { status, .. } if *status == 401 || *status == 403 => {
                "Verify that WATCHMODE_API_KEY is valid and has remaining quota".to_string()
            }
            EtlError::UpstreamStatusError { .. } => {
                "The upstream service rejected the request; try again later".to_string()
            }
            EtlError::IoError(_) => {
                "Make sure the output directory is writable and the disk is not full".to_string()
            }
            EtlError::SerializationError(_) => {
                "Run with --verbose to inspect the payload that failed to process".to_string()
            }
            EtlError::MissingConfigError { field } => {
                format!("Set {} in the environment or in the TOML config file", field)
            }
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Review the CLI flags and the TOML config file".to_string()
            }
            EtlError::NotificationError { .. } => {
                "Verify TELEGRAM_TOKEN and TELEGRAM_CHAT_ID, and that the bot can post to the chat"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the release catalog: {}", self),
            ErrorCategory::Storage => format!("Could not write the snapshot: {}", self),
            ErrorCategory::Data => format!("Received data could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Delivery => format!("Could not send the notification: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
