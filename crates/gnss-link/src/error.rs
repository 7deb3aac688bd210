//! Receiver Link Error Types

use thiserror::Error;

/// Errors that can occur on the receiver serial link
#[derive(Debug, Error)]
pub enum LinkError {
    /// Serial port open/configure error
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// I/O error while reading the byte stream
    #[error("Link read error: {0}")]
    ReadError(String),

    /// Link used before any baud rate was configured
    #[error("Link is not open")]
    NotOpen,
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::ReadError(err.to_string())
    }
}

impl From<tokio_serial::Error> for LinkError {
    fn from(err: tokio_serial::Error) -> Self {
        LinkError::SerialError(err.to_string())
    }
}
