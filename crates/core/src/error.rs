use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimesliceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TimesliceError>;
