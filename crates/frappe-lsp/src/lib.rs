//! Language Server Protocol host for the Frappe completion engine
//!
//! The server speaks `Content-Length` framed JSON-RPC over stdio, keeps the
//! open documents in memory (full sync) and answers `textDocument/completion`
//! by calling a [`frappe_completion::CompletionEngine`].
//!
//! # Lifecycle
//!
//! `Initializing` → `Initialized` → `ShuttingDown` → `ShutDown`. Requests
//! other than `initialize` are rejected until the client sends `initialized`.
//!
//! # Server-to-client messages
//!
//! - `window/showMessage` once after initialisation, when enabled in the
//!   engine configuration
//! - `window/showDocument` when the client executes `frappe-helper.openDocs`

pub mod commands;
pub mod completion;
pub mod server;
pub mod transport;
pub mod types;

pub use commands::{CommandAction, OPEN_DOCS_COMMAND};
pub use completion::CompletionHandler;
pub use server::{ClientCapabilities, LspServer, ServerCapabilities};
pub use transport::{
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, LspMessage,
    MessageTransport, StdioTransport, MAX_CONTENT_LENGTH,
};
pub use types::{LspError, LspResult, ServerState};
