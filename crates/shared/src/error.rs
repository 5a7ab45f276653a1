use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COULD_NOT_FAVOUR: &str = "Could not favour it";
pub const COULD_NOT_UNFAVOUR: &str = "Could not unfavour it";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The service answered, but with a negative result.
    OperationDenied,
    /// The call itself failed.
    TransportFailure,
}

/// The single error value a controller exposes to the view.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ControllerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ControllerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OperationDenied, message)
    }

    pub fn transport(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        if message.trim().is_empty() {
            return Self::new(ErrorKind::TransportFailure, "request failed");
        }
        Self::new(ErrorKind::TransportFailure, message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
