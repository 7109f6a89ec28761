use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Transport error: {message}")]
    TransportError { message: String },

    #[error("Timed out after {seconds}s waiting for {stage}")]
    TimeoutError { stage: String, seconds: u64 },

    #[error("Page parsing error: {message}")]
    ParseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
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
    Network,
    Timeout,
    Parsing,
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

impl WatchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    pub fn timeout(stage: impl Into<String>, seconds: u64) -> Self {
        Self::TimeoutError {
            stage: stage.into(),
            seconds,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::TimeoutError { .. } => true,
            Self::HttpError(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            _ if self.is_timeout() => ErrorCategory::Timeout,
            Self::HttpError(_) | Self::TransportError { .. } => ErrorCategory::Network,
            Self::ParseError { .. } => ErrorCategory::Parsing,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::TimeoutError { .. } => {
                ErrorCategory::System
            }
        }
    }

    /// 嚴重程度：輪詢中的錯誤多半下一輪即可恢復
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Timeout | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parsing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Timeout => {
                "The registration site is slow to answer; consider raising the timeout"
            }
            ErrorCategory::Network => {
                "Check the network connection and the endpoint URL; the next poll will retry"
            }
            ErrorCategory::Parsing => {
                "The result table layout may have changed; check the column layout settings"
            }
            ErrorCategory::Configuration => "Fix the highlighted setting and start again",
            ErrorCategory::System => "Check that the browser or local resources are available",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Timeout => format!("Timed out: {}", self),
            ErrorCategory::Network => format!("Failed to reach the registration site: {}", self),
            ErrorCategory::Parsing => format!("Could not read the result table: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
