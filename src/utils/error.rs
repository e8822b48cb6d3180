use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to load model from {path}: {reason}")]
    ModelLoadError { path: String, reason: String },

    #[error("Malformed input: {message}")]
    MalformedInputError { message: String },

    #[error("Invalid value for field {field}: {reason}")]
    InvalidFieldValueError { field: String, reason: String },

    #[error("Prediction failed: {message}")]
    InferenceError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ChurnError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Model,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChurnError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChurnError::ConfigError { .. }
            | ChurnError::ConfigValidationError { .. }
            | ChurnError::InvalidConfigValueError { .. }
            | ChurnError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ChurnError::MalformedInputError { .. } | ChurnError::InvalidFieldValueError { .. } => {
                ErrorCategory::Input
            }
            ChurnError::ModelLoadError { .. } | ChurnError::InferenceError { .. } => {
                ErrorCategory::Model
            }
            ChurnError::IoError(_) | ChurnError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 模型載入失敗必須阻止服務啟動
            ChurnError::ModelLoadError { .. } => ErrorSeverity::Critical,
            ChurnError::ConfigError { .. }
            | ChurnError::ConfigValidationError { .. }
            | ChurnError::InvalidConfigValueError { .. }
            | ChurnError::MissingConfigError { .. } => ErrorSeverity::High,
            ChurnError::InferenceError { .. }
            | ChurnError::IoError(_)
            | ChurnError::SerializationError(_) => ErrorSeverity::Medium,
            // 單一請求的輸入錯誤，不影響其他請求
            ChurnError::MalformedInputError { .. } | ChurnError::InvalidFieldValueError { .. } => {
                ErrorSeverity::Low
            }
        }
    }

    /// 輸入類錯誤回 4xx，其餘回 5xx
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ChurnError::ModelLoadError { path, .. } => format!(
                "Check that the model artifact exists at '{}' and was exported by the training pipeline",
                path
            ),
            ChurnError::MalformedInputError { .. } => {
                "Send a JSON body with exactly the nineteen customer fields and correct types"
                    .to_string()
            }
            ChurnError::InvalidFieldValueError { field, .. } => {
                format!("Correct the value of field '{}' and retry", field)
            }
            ChurnError::InferenceError { .. } => {
                "Retry the request; if the problem persists, re-export the model artifact"
                    .to_string()
            }
            ChurnError::ConfigError { .. }
            | ChurnError::ConfigValidationError { .. }
            | ChurnError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and restart the service".to_string()
            }
            ChurnError::MissingConfigError { field } => {
                format!("Provide '{}' via CLI flag, config file or environment", field)
            }
            ChurnError::IoError(_) => "Check file permissions and paths".to_string(),
            ChurnError::SerializationError(_) => "Check the JSON payload syntax".to_string(),
        }
    }

    /// 對外訊息：不可洩漏內部路徑或堆疊
    pub fn user_friendly_message(&self) -> String {
        match self {
            ChurnError::ModelLoadError { .. } => {
                "The prediction model could not be loaded".to_string()
            }
            ChurnError::MalformedInputError { message } => {
                format!("Malformed input: {}", message)
            }
            ChurnError::InvalidFieldValueError { field, reason } => {
                format!("Invalid value for field {}: {}", field, reason)
            }
            ChurnError::InferenceError { message } => {
                format!("Prediction failed: {}", message)
            }
            other => other.to_string(),
        }
    }
}
