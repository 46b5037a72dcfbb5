#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("Model error: {0}")]
    Model(String),

    #[error("Model error (HTTP {status}): {message}")]
    ModelHttp { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Leaderboard error: {0}")]
    Leaderboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JudgeError>;
