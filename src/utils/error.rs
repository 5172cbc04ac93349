use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Content service rejected request ({status}): {status_text}")]
    RemoteRejection { status: u16, status_text: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unknown content block '{component}' (uid {uid})")]
    UnknownComponent { component: String, uid: String },

    #[error("Invalid '{component}' block (uid {uid}): {message}")]
    InvalidBlock {
        component: String,
        uid: String,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Remote,
    Configuration,
    Content,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContentError::Transport(_) => ErrorCategory::Network,
            ContentError::RemoteRejection { .. } => ErrorCategory::Remote,
            ContentError::ConfigError { .. }
            | ContentError::MissingConfigError { .. }
            | ContentError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ContentError::Decode(_)
            | ContentError::UnknownComponent { .. }
            | ContentError::InvalidBlock { .. } => ErrorCategory::Content,
            ContentError::ValidationError { .. } => ErrorCategory::Input,
            ContentError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContentError::Transport(_) => ErrorSeverity::Medium,
            ContentError::RemoteRejection { status, .. } if *status >= 500 => {
                ErrorSeverity::Medium
            }
            ContentError::RemoteRejection { .. } => ErrorSeverity::High,
            ContentError::ValidationError { .. } => ErrorSeverity::Low,
            ContentError::Decode(_)
            | ContentError::UnknownComponent { .. }
            | ContentError::InvalidBlock { .. } => ErrorSeverity::High,
            ContentError::ConfigError { .. }
            | ContentError::MissingConfigError { .. }
            | ContentError::InvalidConfigValueError { .. }
            | ContentError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ContentError::Transport(_) => {
                "Check network connectivity to the content service and try again".to_string()
            }
            ContentError::RemoteRejection { status: 401, .. } => {
                "Check that the access token is valid for this space".to_string()
            }
            ContentError::RemoteRejection { status: 404, .. } => {
                "Check the slug; the story may be unpublished or renamed".to_string()
            }
            ContentError::RemoteRejection { .. } => {
                "The content service refused the request; retry later".to_string()
            }
            ContentError::MissingConfigError { field } => {
                format!("Provide a value for '{}' via flag, config file or environment", field)
            }
            ContentError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            ContentError::ConfigError { .. } | ContentError::IoError(_) => {
                "Check the configuration file path and its contents".to_string()
            }
            ContentError::UnknownComponent { component, .. } => format!(
                "Remove the '{}' block in the CMS or add support for it",
                component
            ),
            ContentError::InvalidBlock { component, .. } => {
                format!("Fix the fields of the '{}' block in the CMS", component)
            }
            ContentError::Decode(_) => {
                "The content service returned an unexpected payload".to_string()
            }
            ContentError::ValidationError { .. } => "Correct the input and retry".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ContentError::Transport(_) => "Could not reach the content service".to_string(),
            ContentError::RemoteRejection { status, status_text } => {
                format!("Content service error {}: {}", status, status_text)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
