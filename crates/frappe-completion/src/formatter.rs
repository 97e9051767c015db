//! Turns knowledge base entries into suggestion records

use crate::knowledge::SymbolEntry;
use crate::snippet::SnippetSyntax;
use crate::types::{CompletionItem, InsertTextFormat};

/// Prefix placed before every sort key so these suggestions sort ahead of
/// anything else the host offers, alphabetically among themselves.
pub const SORT_PREFIX: &str = "000_";

#[derive(Debug, Clone)]
pub struct ItemFormatter {
    doc_link: Option<String>,
    syntax: SnippetSyntax,
}

impl ItemFormatter {
    pub fn new(doc_link: Option<String>, syntax: SnippetSyntax) -> Self {
        Self { doc_link, syntax }
    }

    pub fn doc_link(&self) -> Option<&str> {
        self.doc_link.as_deref()
    }

    pub fn syntax(&self) -> SnippetSyntax {
        self.syntax
    }

    /// Same formatter with a different output syntax
    pub fn with_syntax(&self, syntax: SnippetSyntax) -> Self {
        Self {
            doc_link: self.doc_link.clone(),
            syntax,
        }
    }

    pub fn format(&self, entry: &SymbolEntry) -> CompletionItem {
        let snippet = self.syntax == SnippetSyntax::Snippet && entry.template.has_slots();
        let (insert_text, insert_text_format) = if snippet {
            (
                entry.template.render(SnippetSyntax::Snippet),
                InsertTextFormat::Snippet,
            )
        } else {
            (entry.template.plain_text(), InsertTextFormat::PlainText)
        };

        CompletionItem {
            label: entry.label.clone(),
            kind: entry.kind,
            detail: entry.detail.clone(),
            insert_text,
            insert_text_format,
            documentation: self.documentation(&entry.detail),
            sort_text: format!("{}{}", SORT_PREFIX, entry.label),
            filter_text: entry.label.clone(),
            preselect: true,
        }
    }

    fn documentation(&self, detail: &str) -> String {
        match &self.doc_link {
            Some(link) => format!("{}\n\n[Frappe Framework documentation]({})", detail, link),
            None => detail.to_string(),
        }
    }
}

impl Default for ItemFormatter {
    fn default() -> Self {
        Self::new(None, SnippetSyntax::Snippet)
    }
}
