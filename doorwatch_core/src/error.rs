use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum WatchError {
    #[error("hardware init failed: {0}")]
    HardwareInit(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
