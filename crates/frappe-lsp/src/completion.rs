//! Code completion support for LSP
//!
//! Converts `textDocument/completion` parameters into an engine call and the
//! engine's items into LSP `CompletionItem` JSON.

use std::sync::Arc;

use frappe_completion::{offset_at, CompletionEngine, CompletionItem, CompletionTrigger, Position};
use serde_json::{json, Value};
use tracing::debug;

use crate::types::{LspError, LspResult};

/// LSP `CompletionTriggerKind.TriggerCharacter`
const TRIGGER_CHARACTER: u64 = 2;

/// Completion handler for LSP
pub struct CompletionHandler {
    engine: Arc<dyn CompletionEngine>,
}

impl CompletionHandler {
    pub fn new(engine: Arc<dyn CompletionEngine>) -> Self {
        Self { engine }
    }

    /// Handle textDocument/completion for a document's current text
    pub fn handle_completion(&self, code: &str, position: Position, trigger: CompletionTrigger) -> Value {
        debug!(
            "Handling completion request at line={}, character={}, trigger={:?}",
            position.line, position.character, trigger
        );

        let offset = offset_at(code, position);
        let items: Vec<Value> = self
            .engine
            .complete(code, offset, trigger)
            .iter()
            .map(completion_item_to_json)
            .collect();

        json!({
            "isIncomplete": false,
            "items": items,
        })
    }
}

/// Read `position` from request params
pub fn position_from_params(params: &Value) -> LspResult<Position> {
    let position = params
        .get("position")
        .ok_or_else(|| LspError::InvalidParams("Missing position".to_string()))?;

    let line = position
        .get("line")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| LspError::InvalidParams("Missing line".to_string()))?;

    let character = position
        .get("character")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| LspError::InvalidParams("Missing character".to_string()))?;

    // Values past u32 saturate, so the position lands at the end of the text
    let line = u32::try_from(line).unwrap_or(u32::MAX);
    let character = u32::try_from(character).unwrap_or(u32::MAX);

    Ok(Position::new(line, character))
}

/// Map the optional LSP completion `context` to an engine trigger
pub fn trigger_from_params(params: &Value) -> CompletionTrigger {
    let Some(context) = params.get("context") else {
        return CompletionTrigger::Invoked;
    };

    let kind = context.get("triggerKind").and_then(|v| v.as_u64());
    let character = context
        .get("triggerCharacter")
        .and_then(|v| v.as_str())
        .and_then(|s| s.chars().next());

    match (kind, character) {
        (Some(TRIGGER_CHARACTER), Some(ch)) => CompletionTrigger::Character(ch),
        _ => CompletionTrigger::Invoked,
    }
}

/// Convert a completion item to LSP JSON format
pub fn completion_item_to_json(item: &CompletionItem) -> Value {
    json!({
        "label": item.label,
        "kind": item.kind.lsp_kind(),
        "detail": item.detail,
        "documentation": {
            "kind": "markdown",
            "value": item.documentation,
        },
        "sortText": item.sort_text,
        "filterText": item.filter_text,
        "insertText": item.insert_text,
        "insertTextFormat": item.insert_text_format.lsp_value(),
        "preselect": item.preselect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use frappe_completion::FrappeCompletionEngine;

    fn handler() -> CompletionHandler {
        CompletionHandler::new(Arc::new(FrappeCompletionEngine::builtin()))
    }

    #[test]
    fn test_trigger_from_params() {
        assert_eq!(trigger_from_params(&json!({})), CompletionTrigger::Invoked);
        assert_eq!(
            trigger_from_params(&json!({"context": {"triggerKind": 1}})),
            CompletionTrigger::Invoked
        );
        assert_eq!(
            trigger_from_params(&json!({"context": {"triggerKind": 2, "triggerCharacter": "."}})),
            CompletionTrigger::Character('.')
        );
        assert_eq!(
            trigger_from_params(&json!({"context": {"triggerKind": 3}})),
            CompletionTrigger::Invoked
        );
    }

    #[test]
    fn test_position_from_params() {
        let params = json!({"position": {"line": 2, "character": 5}});
        assert_eq!(position_from_params(&params).unwrap(), Position::new(2, 5));
        assert!(position_from_params(&json!({"position": {"line": 2}})).is_err());
    }

    #[test]
    fn test_position_beyond_u32_saturates() {
        let params = json!({"position": {"line": 4294967296u64, "character": 7}});
        let position = position_from_params(&params).unwrap();
        assert_eq!(position, Position::new(u32::MAX, 7));

        // Must not wrap around to line 0 and complete after `frappe.`
        let result = handler().handle_completion(
            "frappe.\nx",
            position,
            CompletionTrigger::Character('.'),
        );
        assert!(result["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_handle_completion_on_second_line() {
        let code = "// client script\nfrappe.session.";
        let result = handler().handle_completion(
            code,
            Position::new(1, 15),
            CompletionTrigger::Character('.'),
        );

        assert_eq!(result["isIncomplete"], json!(false));
        let items = result["items"].as_array().unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0]["label"], json!("user"));
        assert_eq!(items[0]["kind"], json!(10));
        assert_eq!(items[0]["sortText"], json!("000_user"));
        assert_eq!(items[0]["insertTextFormat"], json!(1));
        assert_eq!(items[0]["preselect"], json!(true));
    }

    #[test]
    fn test_snippet_item_json() {
        let result = handler().handle_completion(
            "frappe.db.",
            Position::new(0, 10),
            CompletionTrigger::Character('.'),
        );
        let exists = result["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["label"] == json!("exists"))
            .cloned()
            .unwrap();
        assert_eq!(exists["kind"], json!(2));
        assert_eq!(exists["insertTextFormat"], json!(2));
        assert_eq!(exists["insertText"], json!("exists(\"${1:doctype}\", \"${2:name}\")"));
        assert_eq!(exists["documentation"]["value"], json!("Check if document exists"));
    }

    #[test]
    fn test_no_domain_returns_empty_list() {
        let result = handler().handle_completion("let a", Position::new(0, 5), CompletionTrigger::Invoked);
        // globals are always active on invocation
        assert_eq!(result["items"].as_array().unwrap().len(), 6);

        let result = handler().handle_completion(
            "let a;",
            Position::new(0, 6),
            CompletionTrigger::Character(';'),
        );
        assert!(result["items"].as_array().unwrap().is_empty());
    }
}
