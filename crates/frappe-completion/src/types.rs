//! Core types for the completion engine
//!
//! Suggestion records, symbol kinds, positions, request triggers and the
//! error type shared by the ambient layers (configuration, validation).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors raised outside the completion path.
///
/// The completion path itself never fails; these cover configuration
/// loading and knowledge base validation.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Knowledge base invariant violated
    #[error("Invalid knowledge base: {0}")]
    InvalidKnowledgeBase(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Kind of an API symbol. Informational only; matching ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Property,
    Method,
    Function,
    Variable,
}

impl SymbolKind {
    /// Whether the symbol is inserted with call or block syntax
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Method | SymbolKind::Function)
    }

    /// LSP `CompletionItemKind` number
    pub fn lsp_kind(&self) -> u32 {
        match self {
            SymbolKind::Method => 2,
            SymbolKind::Function => 3,
            SymbolKind::Variable => 6,
            SymbolKind::Property => 10,
        }
    }
}

/// How the host should interpret `insert_text`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertTextFormat {
    /// Literal text
    PlainText,
    /// Snippet syntax with `${n:default}` placeholders and `$0`
    Snippet,
}

impl InsertTextFormat {
    /// LSP `InsertTextFormat` number
    pub fn lsp_value(&self) -> u32 {
        match self {
            InsertTextFormat::PlainText => 1,
            InsertTextFormat::Snippet => 2,
        }
    }
}

/// A rendered suggestion, created fresh per request and owned by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    /// Symbol name shown in the suggestion list
    pub label: String,
    pub kind: SymbolKind,
    /// One-line description of the symbol
    pub detail: String,
    /// Text inserted on accept, in the syntax named by `insert_text_format`
    pub insert_text: String,
    pub insert_text_format: InsertTextFormat,
    /// Markdown documentation: the detail plus an optional reference link
    pub documentation: String,
    /// Ordering key (`000_` + label)
    pub sort_text: String,
    /// Key the client narrows by while the user types; always the label
    pub filter_text: String,
    /// Whether the client should select this item up front
    pub preselect: bool,
}

/// Position in a document
///
/// `character` counts UTF-16 code units, matching what editor hosts send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-based)
    pub line: u32,
    /// Character offset within the line (0-based)
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// What caused the host to ask for completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionTrigger {
    /// Explicit invocation (e.g. Ctrl+Space) or typing an identifier
    #[default]
    Invoked,
    /// A registered trigger character was typed
    Character(char),
}

impl CompletionTrigger {
    pub fn character(&self) -> Option<char> {
        match self {
            CompletionTrigger::Invoked => None,
            CompletionTrigger::Character(c) => Some(*c),
        }
    }
}
