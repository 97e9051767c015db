//! Workspace commands and server-to-client messages

use serde_json::{json, Value};

use crate::types::{LspError, LspResult};

/// Opens the Frappe API documentation in the client's browser
pub const OPEN_DOCS_COMMAND: &str = "frappe-helper.openDocs";

/// Commands advertised through `executeCommandProvider`
pub const COMMANDS: &[&str] = &[OPEN_DOCS_COMMAND];

/// LSP `MessageType.Info`
const MESSAGE_TYPE_INFO: u32 = 3;

const WELCOME_MESSAGE: &str =
    "Frappe Helper is active. Type `frappe.`, `frm.` or open a `frappe.ui.form.on` block for suggestions.";

/// What the server does in response to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// Ask the client to open `uri` externally
    ShowDocument { uri: String },
}

impl CommandAction {
    /// The server-to-client request carrying out this action
    pub fn request(&self) -> (&'static str, Value) {
        match self {
            CommandAction::ShowDocument { uri } => (
                "window/showDocument",
                json!({
                    "uri": uri,
                    "external": true,
                    "takeFocus": true,
                }),
            ),
        }
    }
}

/// Resolve a `workspace/executeCommand` call
pub fn resolve_command(command: &str, documentation_url: &str) -> LspResult<CommandAction> {
    match command {
        OPEN_DOCS_COMMAND => Ok(CommandAction::ShowDocument {
            uri: documentation_url.to_string(),
        }),
        other => Err(LspError::InvalidParams(format!("Unknown command: {}", other))),
    }
}

/// Params of the `window/showMessage` notification sent after initialisation
pub fn welcome_message() -> Value {
    json!({
        "type": MESSAGE_TYPE_INFO,
        "message": WELCOME_MESSAGE,
    })
}
