//! Error types for the bridge
use thiserror::Error;

/// Bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// DMX output backend failure
    #[error("DMX output error: {0}")]
    Output(String),
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
