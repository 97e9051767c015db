//! LSP Server implementation
//!
//! This module implements the server lifecycle, the open-document store and
//! request routing to the completion handler and workspace commands.

use std::{collections::HashMap, sync::Arc};

use frappe_completion::{CompletionEngine, EngineConfig, FrappeCompletionEngine, ProviderRegistry};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::{
    commands::{resolve_command, welcome_message, COMMANDS},
    completion::{position_from_params, trigger_from_params, CompletionHandler},
    transport::{
        JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, LspMessage,
        MessageTransport,
    },
    types::{LspError, LspResult, ServerState},
};

/// Server capabilities
#[derive(Debug, Clone)]
pub struct ServerCapabilities {
    /// Text document sync kind (1 = full)
    pub text_document_sync: u32,
    /// Characters that make the client ask for completions
    pub trigger_characters: Vec<char>,
    /// Commands accepted by `workspace/executeCommand`
    pub commands: Vec<String>,
}

impl Default for ServerCapabilities {
    fn default() -> Self {
        Self {
            text_document_sync: 1,
            trigger_characters: ProviderRegistry::with_builtin_providers().trigger_characters(),
            commands: COMMANDS.iter().map(|command| command.to_string()).collect(),
        }
    }
}

impl ServerCapabilities {
    /// Convert to JSON
    pub fn to_json(&self) -> Value {
        let trigger_characters: Vec<String> = self
            .trigger_characters
            .iter()
            .map(|ch| ch.to_string())
            .collect();

        json!({
            "textDocumentSync": self.text_document_sync,
            "completionProvider": {
                "resolveProvider": false,
                "triggerCharacters": trigger_characters,
            },
            "executeCommandProvider": {
                "commands": self.commands,
            },
        })
    }
}

/// Client capabilities
#[derive(Debug, Clone)]
pub struct ClientCapabilities {
    /// Raw capabilities from client
    pub raw: Value,
}

impl ClientCapabilities {
    /// Wrap the `capabilities` object of `initialize` params
    pub fn from_json(value: Value) -> Self {
        Self { raw: value }
    }

    /// Whether completion items may carry snippet syntax
    pub fn snippet_support(&self) -> bool {
        self.raw
            .pointer("/textDocument/completion/completionItem/snippetSupport")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// LSP Server
pub struct LspServer {
    state: ServerState,
    config: EngineConfig,
    capabilities: ServerCapabilities,
    client_capabilities: Option<ClientCapabilities>,
    /// Open documents (URI -> content)
    documents: HashMap<String, String>,
    completion_handler: Option<CompletionHandler>,
    /// Server-to-client messages waiting to be written
    outgoing: Vec<LspMessage>,
    next_request_id: i64,
    clean_exit: bool,
}

impl LspServer {
    /// Create a server in the `Initializing` state. The completion engine is
    /// built during `initialize` unless one is registered first.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: ServerState::Initializing,
            config,
            capabilities: ServerCapabilities::default(),
            client_capabilities: None,
            documents: HashMap::new(),
            completion_handler: None,
            outgoing: Vec::new(),
            next_request_id: 1,
            clean_exit: false,
        }
    }

    /// Register a completion engine.
    ///
    /// Without one, `initialize` builds the Frappe engine from the server's
    /// configuration and the client's snippet support.
    pub fn register_completion_engine(&mut self, engine: Arc<dyn CompletionEngine>) {
        self.completion_handler = Some(CompletionHandler::new(engine));
        info!("Completion engine registered");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    pub fn client_capabilities(&self) -> Option<&ClientCapabilities> {
        self.client_capabilities.as_ref()
    }

    /// Whether `exit` arrived after `shutdown`
    pub fn exited_cleanly(&self) -> bool {
        self.clean_exit
    }

    /// Current text of an open document
    pub fn get_document(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|s| s.as_str())
    }

    /// Store or replace a document's full text
    pub fn set_document(&mut self, uri: String, content: String) {
        self.documents.insert(uri, content);
    }

    pub fn remove_document(&mut self, uri: &str) {
        self.documents.remove(uri);
    }

    /// Drain messages the server wants to send to the client
    pub fn take_outgoing(&mut self) -> Vec<LspMessage> {
        std::mem::take(&mut self.outgoing)
    }

    fn send_notification(&mut self, method: &str, params: Value) {
        debug!("Queueing notification: method={}", method);
        self.outgoing
            .push(LspMessage::Notification(JsonRpcNotification::new(method, Some(params))));
    }

    fn send_request(&mut self, method: &str, params: Value) {
        let id = json!(self.next_request_id);
        self.next_request_id += 1;
        debug!("Queueing request: method={}, id={}", method, id);
        self.outgoing
            .push(LspMessage::Request(JsonRpcRequest::new(id, method, Some(params))));
    }

    fn ensure_initialized(&self) -> LspResult<()> {
        if self.state != ServerState::Initialized {
            return Err(LspError::InvalidRequest(
                "Server is not initialized".to_string(),
            ));
        }
        Ok(())
    }

    /// Handle initialize request
    pub async fn handle_initialize(&mut self, params: Value) -> LspResult<Value> {
        if self.state != ServerState::Initializing || self.client_capabilities.is_some() {
            return Err(LspError::InvalidRequest(
                "Server is not in initializing state".to_string(),
            ));
        }

        info!("Initializing LSP server");

        let client_capabilities =
            ClientCapabilities::from_json(params.get("capabilities").cloned().unwrap_or(json!({})));

        if self.completion_handler.is_none() {
            let mut engine_config = self.config.clone();
            if engine_config.snippet_support && !client_capabilities.snippet_support() {
                info!("Client does not support snippets, completing with plain text");
                engine_config.snippet_support = false;
            }
            self.register_completion_engine(Arc::new(FrappeCompletionEngine::from_config(
                &engine_config,
            )));
        }
        self.client_capabilities = Some(client_capabilities);

        info!("LSP server initialization complete");
        Ok(json!({
            "capabilities": self.capabilities.to_json(),
            "serverInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }
        }))
    }

    /// Handle initialized notification
    pub async fn handle_initialized(&mut self) -> LspResult<()> {
        if self.state != ServerState::Initializing {
            return Err(LspError::InvalidRequest(
                "Server is not in initializing state".to_string(),
            ));
        }
        if self.client_capabilities.is_none() {
            return Err(LspError::InvalidRequest(
                "Initialized received before initialize".to_string(),
            ));
        }

        self.state = ServerState::Initialized;
        info!("Server state changed to Initialized");

        if self.config.show_welcome_message {
            self.send_notification("window/showMessage", welcome_message());
        }
        Ok(())
    }

    /// Handle shutdown request
    pub async fn handle_shutdown(&mut self) -> LspResult<Value> {
        self.ensure_initialized()?;

        info!("Shutdown request received");
        self.state = ServerState::ShuttingDown;
        Ok(json!(null))
    }

    /// Handle exit notification. The server stops either way; exiting
    /// without a prior `shutdown` is reported as an error.
    pub async fn handle_exit(&mut self) -> LspResult<()> {
        self.clean_exit = self.state == ServerState::ShuttingDown;
        self.state = ServerState::ShutDown;
        info!("Server state changed to ShutDown");

        if !self.clean_exit {
            return Err(LspError::InvalidRequest(
                "Exit received before shutdown".to_string(),
            ));
        }
        Ok(())
    }

    /// Handle did_open notification
    pub async fn handle_did_open(&mut self, params: Value) -> LspResult<()> {
        self.ensure_initialized()?;

        let text_document = params
            .get("textDocument")
            .ok_or_else(|| LspError::InvalidParams("Missing textDocument".to_string()))?;
        let uri = document_uri(&params)?;

        let text = text_document
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LspError::InvalidParams("Missing text".to_string()))?;

        debug!("Document opened: uri={}, size={} bytes", uri, text.len());
        self.set_document(uri.to_string(), text.to_string());
        Ok(())
    }

    /// Handle did_change notification (full sync)
    pub async fn handle_did_change(&mut self, params: Value) -> LspResult<()> {
        self.ensure_initialized()?;

        let uri = document_uri(&params)?;
        let content_changes = params
            .get("contentChanges")
            .and_then(|v| v.as_array())
            .ok_or_else(|| LspError::InvalidParams("Missing contentChanges".to_string()))?;

        if let Some(text) = content_changes
            .last()
            .and_then(|change| change.get("text"))
            .and_then(|v| v.as_str())
        {
            debug!("Document changed: uri={}, size={} bytes", uri, text.len());
            self.set_document(uri.to_string(), text.to_string());
        }
        Ok(())
    }

    /// Handle did_close notification
    pub async fn handle_did_close(&mut self, params: Value) -> LspResult<()> {
        self.ensure_initialized()?;

        let uri = document_uri(&params)?;
        debug!("Document closed: uri={}", uri);
        self.remove_document(uri);
        Ok(())
    }

    /// Handle textDocument/completion request
    pub async fn handle_completion(&self, params: Value) -> LspResult<Value> {
        self.ensure_initialized()?;

        let uri = document_uri(&params)?;
        let position = position_from_params(&params)?;
        let trigger = trigger_from_params(&params);

        let code = self
            .get_document(uri)
            .ok_or_else(|| LspError::InvalidParams(format!("Document not found: {}", uri)))?;

        let handler = self
            .completion_handler
            .as_ref()
            .ok_or_else(|| LspError::InternalError("No completion engine registered".to_string()))?;

        Ok(handler.handle_completion(code, position, trigger))
    }

    /// Handle workspace/executeCommand request
    pub async fn handle_execute_command(&mut self, params: Value) -> LspResult<Value> {
        self.ensure_initialized()?;

        let command = params
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LspError::InvalidParams("Missing command".to_string()))?;

        info!("Executing command: {}", command);
        let action = resolve_command(command, &self.config.documentation_url)?;
        let (method, request_params) = action.request();
        self.send_request(method, request_params);
        Ok(json!(null))
    }

    /// Process a message
    async fn process_message(&mut self, message: LspMessage) -> LspResult<Option<Value>> {
        match message {
            LspMessage::Request(req) => {
                let params = req.params.unwrap_or(json!({}));
                match req.method.as_str() {
                    "initialize" => self.handle_initialize(params).await,
                    "shutdown" => self.handle_shutdown().await,
                    "textDocument/completion" => self.handle_completion(params).await,
                    "workspace/executeCommand" => self.handle_execute_command(params).await,
                    _ => Err(LspError::MethodNotFound(req.method)),
                }
                .map(Some)
            }
            LspMessage::Notification(notif) => {
                let params = notif.params.unwrap_or(json!({}));
                match notif.method.as_str() {
                    "initialized" => self.handle_initialized().await,
                    "textDocument/didOpen" => self.handle_did_open(params).await,
                    "textDocument/didChange" => self.handle_did_change(params).await,
                    "textDocument/didClose" => self.handle_did_close(params).await,
                    "exit" => self.handle_exit().await,
                    method => {
                        debug!("Ignoring notification: method={}", method);
                        Ok(())
                    }
                }
                .map(|_| None)
            }
            LspMessage::Response(resp) => {
                debug!("Received response: id={}", resp.id);
                Ok(None)
            }
        }
    }

    /// Handle one incoming message, returning the response to send, if any
    pub async fn handle_message(&mut self, message: LspMessage) -> Option<LspMessage> {
        let request_id = match &message {
            LspMessage::Request(req) => {
                debug!("Received request: method={}, id={}", req.method, req.id);
                Some(req.id.clone())
            }
            LspMessage::Notification(notif) => {
                debug!("Received notification: method={}", notif.method);
                None
            }
            LspMessage::Response(_) => None,
        };

        let result = self.process_message(message).await;

        match (request_id, result) {
            (Some(id), Ok(result)) => Some(LspMessage::Response(JsonRpcResponse::success(
                id,
                result.unwrap_or(Value::Null),
            ))),
            (Some(id), Err(err)) => {
                log_request_error(&err);
                Some(LspMessage::Response(JsonRpcResponse::error(
                    id,
                    JsonRpcError::from(&err),
                )))
            }
            (None, Ok(_)) => None,
            (None, Err(err)) => {
                warn!("Error processing notification: {}", err);
                None
            }
        }
    }

    /// Serve messages from `transport` until `exit` or end of input
    pub async fn run<R, W>(&mut self, transport: &mut MessageTransport<R, W>) -> LspResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("LSP server started");

        loop {
            match transport.read_message().await {
                Ok(Some(message)) => {
                    if let Some(response) = self.handle_message(message).await {
                        transport.write_message(&response).await?;
                    }
                    for outgoing in self.take_outgoing() {
                        transport.write_message(&outgoing).await?;
                    }
                }
                Ok(None) => {
                    info!("Input closed");
                    break;
                }
                Err(LspError::IoError(msg)) => {
                    error!("Failed to read message: {}", msg);
                    return Err(LspError::IoError(msg));
                }
                Err(err) => {
                    error!("Failed to read message: {}", err);
                    let response = JsonRpcResponse::error(Value::Null, JsonRpcError::from(&err));
                    transport
                        .write_message(&LspMessage::Response(response))
                        .await?;
                }
            }

            if self.state == ServerState::ShutDown {
                break;
            }
        }

        info!("LSP server stopped");
        Ok(())
    }
}

impl Default for LspServer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn document_uri(params: &Value) -> LspResult<&str> {
    params
        .get("textDocument")
        .ok_or_else(|| LspError::InvalidParams("Missing textDocument".to_string()))?
        .get("uri")
        .and_then(|v| v.as_str())
        .ok_or_else(|| LspError::InvalidParams("Missing uri".to_string()))
}

fn log_request_error(err: &LspError) {
    match err {
        LspError::MethodNotFound(method) => warn!("Method not found: {}", method),
        LspError::InvalidParams(msg) => warn!("Invalid parameters: {}", msg),
        LspError::InvalidRequest(msg) => warn!("Invalid request: {}", msg),
        _ => error!("Error processing request: {}", err),
    }
}
