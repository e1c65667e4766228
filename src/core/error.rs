use thiserror::Error;

#[derive(Error, Debug)]
pub enum AscendError {
    #[error("Invalid trait key '{0}'")]
    InvalidKey(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Selection '{0}' is outside the configured grants and pools")]
    SelectionOutsideConfiguration(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Content error: {0}")]
    ContentError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AscendError>;
