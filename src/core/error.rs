use serde::Serialize;
use thiserror::Error;

use crate::core::types::RoomCode;

#[derive(Error, Debug)]
pub enum EchoError {
    #[error("Room does not exist: {0}")]
    RoomNotFound(RoomCode),

    #[error("Invalid room creation. The room code already exists: {0}")]
    RoomAlreadyExists(RoomCode),

    #[error("Invalid edit: cell ({row}, {col}) is outside the grid")]
    InvalidEdit { row: i64, col: i64 },

    #[error("Invalid delay: {requested}ms is outside [{min}, {max}]ms")]
    InvalidDelay { requested: u64, min: u64, max: u64 },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl EchoError {
    /// Short machine-readable code sent back to the requester
    pub fn kind(&self) -> &'static str {
        match self {
            EchoError::RoomNotFound(_) => "roomNotFound",
            EchoError::RoomAlreadyExists(_) => "roomCodeExists",
            EchoError::InvalidEdit { .. } => "invalidEdit",
            EchoError::InvalidDelay { .. } => "invalidDelay",
            EchoError::Config(_) => "config",
            EchoError::IoError(_) => "io",
            EchoError::TomlError(_) => "toml",
            EchoError::SerdeError(_) => "serialization",
        }
    }

    pub fn to_rejection(&self) -> Rejection {
        Rejection {
            error: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Rejection payload handed to the transport layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub error: &'static str,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, EchoError>;
