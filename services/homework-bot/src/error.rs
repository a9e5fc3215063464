//! Error types for the homework bot

/// Errors that can occur while polling homework statuses and relaying them
#[derive(Debug, thiserror::Error)]
pub enum HomeworkBotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API unavailable: status {status}, reason '{reason}', body '{body}'")]
    UpstreamStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Response is not a JSON object, got {0}")]
    Shape(String),

    #[error("Key 'homeworks' is missing from the response")]
    MissingHomeworks,

    #[error("Key 'current_date' is missing from the response")]
    MissingCursor,

    #[error("Unexpected type: {0}")]
    InvalidType(String),

    #[error("Homework record is missing '{0}'")]
    MissingFields(String),

    #[error("Unrecognized homework status: {0}")]
    UnrecognizedStatus(String),

    #[error("Message delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HomeworkBotError {
    /// Short stable name of the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            HomeworkBotError::Config(_) => "config",
            HomeworkBotError::Transport(_) => "transport",
            HomeworkBotError::UpstreamStatus { .. } => "upstream_status",
            HomeworkBotError::Decode(_) => "decode",
            HomeworkBotError::Shape(_) => "shape",
            HomeworkBotError::MissingHomeworks => "missing_homeworks",
            HomeworkBotError::MissingCursor => "missing_cursor",
            HomeworkBotError::InvalidType(_) => "invalid_type",
            HomeworkBotError::MissingFields(_) => "missing_fields",
            HomeworkBotError::UnrecognizedStatus(_) => "unrecognized_status",
            HomeworkBotError::DeliveryFailed(_) => "delivery_failed",
            HomeworkBotError::Io(_) => "io",
            HomeworkBotError::Json(_) => "json",
        }
    }
}

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, HomeworkBotError>;
