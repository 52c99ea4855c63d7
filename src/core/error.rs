use thiserror::Error;

#[derive(Error, Debug)]
pub enum HerdError {
    /// Malformed input rejected at construction or reset time
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal invariant was broken; the step that found it was not applied
    #[error("State inconsistency: {0}")]
    StateInconsistency(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl HerdError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::StateInconsistency(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, HerdError>;
