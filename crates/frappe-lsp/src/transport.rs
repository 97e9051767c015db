//! JSON-RPC message transport
//!
//! Messages are framed with a `Content-Length` header and carried over any
//! async byte stream. The server binary uses stdin/stdout; tests drive the
//! same code through in-memory pipes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;

use crate::types::{LspError, LspResult};

const JSONRPC_VERSION: &str = "2.0";

/// Largest message body the reader will allocate for
pub const MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// JSON-RPC request message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Request ID (number or string)
    pub id: Value,
    /// Method name
    pub method: String,
    /// Request parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// ID of the request being answered; null when it could not be read
    pub id: Value,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// JSON-RPC error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&LspError> for JsonRpcError {
    fn from(err: &LspError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// JSON-RPC notification message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Method name
    pub method: String,
    /// Notification parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
        }
    }
}

/// LSP message (request, response, or notification)
#[derive(Debug, Clone, PartialEq)]
pub enum LspMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Notification(JsonRpcNotification),
}

impl LspMessage {
    /// Parse a message from JSON
    pub fn from_json(json: &str) -> LspResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| LspError::ParseError(format!("Failed to parse JSON: {}", e)))?;

        let has_method = value.get("method").is_some();
        let has_id = value.get("id").is_some();

        if value.get("result").is_some() || value.get("error").is_some() {
            serde_json::from_value(value)
                .map(LspMessage::Response)
                .map_err(|e| LspError::ParseError(format!("Failed to parse response: {}", e)))
        } else if has_method && has_id {
            serde_json::from_value(value)
                .map(LspMessage::Request)
                .map_err(|e| LspError::ParseError(format!("Failed to parse request: {}", e)))
        } else if has_method {
            serde_json::from_value(value)
                .map(LspMessage::Notification)
                .map_err(|e| LspError::ParseError(format!("Failed to parse notification: {}", e)))
        } else {
            Err(LspError::InvalidRequest(
                "Message must be a request, response, or notification".to_string(),
            ))
        }
    }

    /// Serialize message to JSON
    pub fn to_json(&self) -> LspResult<String> {
        let result = match self {
            LspMessage::Request(req) => serde_json::to_string(req),
            LspMessage::Response(resp) => serde_json::to_string(resp),
            LspMessage::Notification(notif) => serde_json::to_string(notif),
        };
        result.map_err(|e| LspError::SerializationError(format!("Failed to serialize message: {}", e)))
    }

    /// Method name, for requests and notifications
    pub fn method(&self) -> Option<&str> {
        match self {
            LspMessage::Request(req) => Some(&req.method),
            LspMessage::Notification(notif) => Some(&notif.method),
            LspMessage::Response(_) => None,
        }
    }
}

/// `Content-Length` framed transport over an async reader and writer
pub struct MessageTransport<R, W> {
    reader: R,
    writer: W,
}

/// Transport over the process's stdin and stdout
pub type StdioTransport = MessageTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> MessageTransport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read the next framed message.
    ///
    /// Returns `Ok(None)` once the reader is exhausted.
    pub async fn read_message(&mut self) -> LspResult<Option<LspMessage>> {
        let mut content_length: Option<usize> = None;
        let mut saw_header = false;

        loop {
            let mut line = String::new();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(|e| LspError::IoError(format!("Failed to read header: {}", e)))?;

            if read == 0 {
                if saw_header {
                    return Err(LspError::IoError("Unexpected end of stream in headers".to_string()));
                }
                return Ok(None);
            }

            let line = line.trim();
            if line.is_empty() {
                if saw_header {
                    break;
                }
                continue;
            }
            saw_header = true;

            if let Some((key, value)) = line.split_once(':') {
                if key.trim().eq_ignore_ascii_case("Content-Length") {
                    let length: u64 = value
                        .trim()
                        .parse()
                        .map_err(|e| LspError::InvalidRequest(format!("Invalid Content-Length: {}", e)))?;
                    let length = usize::try_from(length)
                        .ok()
                        .filter(|length| *length <= MAX_CONTENT_LENGTH)
                        .ok_or_else(|| {
                            LspError::InvalidRequest(format!(
                                "Content-Length {} exceeds the {} byte limit",
                                length, MAX_CONTENT_LENGTH
                            ))
                        })?;
                    content_length = Some(length);
                }
            }
        }

        let content_length = content_length
            .ok_or_else(|| LspError::InvalidRequest("Missing Content-Length header".to_string()))?;

        let mut content = vec![0u8; content_length];
        self.reader
            .read_exact(&mut content)
            .await
            .map_err(|e| LspError::IoError(format!("Failed to read content: {}", e)))?;

        let json = String::from_utf8(content)
            .map_err(|e| LspError::ParseError(format!("Invalid UTF-8: {}", e)))?;
        trace!("<- {}", json);

        LspMessage::from_json(&json).map(Some)
    }

    /// Write a framed message and flush
    pub async fn write_message(&mut self, message: &LspMessage) -> LspResult<()> {
        let json = message.to_json()?;
        trace!("-> {}", json);

        self.writer
            .write_all(format!("Content-Length: {}\r\n\r\n{}", json.len(), json).as_bytes())
            .await
            .map_err(|e| LspError::IoError(format!("Failed to write message: {}", e)))?;

        self.writer
            .flush()
            .await
            .map_err(|e| LspError::IoError(format!("Failed to flush output: {}", e)))?;

        Ok(())
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}
