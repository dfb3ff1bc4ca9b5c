use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GpError>;
