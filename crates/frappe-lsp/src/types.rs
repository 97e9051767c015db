//! Core host types
//!
//! Error types and the server lifecycle state shared by the transport and
//! the request handlers.

use serde::{Deserialize, Serialize};

/// Result type for LSP operations
pub type LspResult<T> = Result<T, LspError>;

/// LSP-specific error type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LspError {
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LspError {
    /// JSON-RPC error code of the same meaning
    pub fn code(&self) -> i32 {
        match self {
            LspError::ParseError(_) => -32700,
            LspError::InvalidRequest(_) => -32600,
            LspError::MethodNotFound(_) => -32601,
            LspError::InvalidParams(_) => -32602,
            LspError::InternalError(_) | LspError::IoError(_) | LspError::SerializationError(_) => {
                -32603
            }
        }
    }
}

/// Server state tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for `initialize` and `initialized`
    Initializing,
    /// Serving requests
    Initialized,
    /// `shutdown` received, waiting for `exit`
    ShuttingDown,
    /// `exit` received
    ShutDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LspError::ParseError("x".into()).code(), -32700);
        assert_eq!(LspError::InvalidRequest("x".into()).code(), -32600);
        assert_eq!(LspError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(LspError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(LspError::IoError("x".into()).code(), -32603);
    }

    #[test]
    fn test_error_display() {
        let err = LspError::MethodNotFound("textDocument/hover".to_string());
        assert_eq!(err.to_string(), "Method not found: textDocument/hover");
    }
}
