//! Knowledge base of Frappe client API symbols
//!
//! Symbols are partitioned into [`Domain`]s. The built-in knowledge base is
//! constructed once from the literal tables in [`crate::tables`] and never
//! mutated afterwards; engines share it through an `Arc`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::snippet::Template;
use crate::tables;
use crate::types::{CompletionError, CompletionResult, SymbolKind};

static BUILTIN: Lazy<Arc<KnowledgeBase>> = Lazy::new(|| Arc::new(KnowledgeBase::builtin()));

/// A partition of the knowledge base with its own activation condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Members of `frappe`
    RootNamespace,
    /// Properties of `frappe.session`
    Session,
    /// Methods of `frappe.db`
    Database,
    /// Members of `frappe.ui`
    UiNamespace,
    /// The `frappe.ui.form.on` handler-map skeleton
    AttachHandler,
    /// Members of a form instance (`frm`)
    FormInstance,
    /// Form event names usable as handler-map keys
    FormEvents,
    /// Globals available anywhere in a client script
    Globals,
}

impl Domain {
    /// Every domain, in trigger evaluation order
    pub const ALL: [Domain; 8] = [
        Domain::RootNamespace,
        Domain::Session,
        Domain::Database,
        Domain::UiNamespace,
        Domain::AttachHandler,
        Domain::FormInstance,
        Domain::FormEvents,
        Domain::Globals,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::RootNamespace => "root_namespace",
            Domain::Session => "session",
            Domain::Database => "database",
            Domain::UiNamespace => "ui_namespace",
            Domain::AttachHandler => "attach_handler",
            Domain::FormInstance => "form_instance",
            Domain::FormEvents => "form_events",
            Domain::Globals => "globals",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One documented, insertable API member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Member name, unique within its domain
    pub label: String,
    pub kind: SymbolKind,
    /// Short human-readable description
    pub detail: String,
    /// What gets inserted; equal to the label for properties and variables
    pub template: Template,
}

impl SymbolEntry {
    pub fn new(label: &str, kind: SymbolKind, detail: &str, template: Template) -> Self {
        Self {
            label: label.to_string(),
            kind,
            detail: detail.to_string(),
            template,
        }
    }

    /// A property or variable: the template is the label itself
    pub fn plain(label: &str, kind: SymbolKind, detail: &str) -> Self {
        Self::new(label, kind, detail, Template::text(label))
    }
}

/// Immutable, domain-partitioned symbol tables
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<Domain, Vec<SymbolEntry>>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the knowledge base from the literal Frappe tables
    pub fn builtin() -> Self {
        let mut kb = Self::new();
        for domain in Domain::ALL {
            kb.insert(domain, tables::entries(domain));
        }
        kb
    }

    /// The process-wide built-in knowledge base, constructed on first use
    pub fn shared() -> Arc<KnowledgeBase> {
        Arc::clone(&BUILTIN)
    }

    /// Add a domain's entries. Used while constructing a knowledge base;
    /// replaces any entries already present for `domain`.
    pub fn insert(&mut self, domain: Domain, entries: Vec<SymbolEntry>) {
        self.entries.insert(domain, entries);
    }

    /// Entries for a domain in table order. An absent domain yields an empty slice.
    pub fn entries_for(&self, domain: Domain) -> &[SymbolEntry] {
        self.entries
            .get(&domain)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Domains present, in trigger evaluation order
    pub fn domains(&self) -> Vec<Domain> {
        Domain::ALL
            .into_iter()
            .filter(|domain| self.entries.contains_key(domain))
            .collect()
    }

    /// Total number of entries across all domains
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the table invariants.
    ///
    /// Labels must be non-empty and unique within their domain. Templates
    /// carry at most one final cursor and no unparsable placeholder, and a
    /// property or variable template equals its label.
    pub fn validate(&self) -> CompletionResult<()> {
        for domain in self.domains() {
            let mut seen = HashSet::new();
            for entry in self.entries_for(domain) {
                if entry.label.is_empty() {
                    return Err(CompletionError::InvalidKnowledgeBase(format!(
                        "empty label in domain {}",
                        domain
                    )));
                }

                if !seen.insert(entry.label.as_str()) {
                    return Err(CompletionError::InvalidKnowledgeBase(format!(
                        "duplicate label '{}' in domain {}",
                        entry.label, domain
                    )));
                }

                if entry.template.final_cursor_count() > 1 {
                    return Err(CompletionError::InvalidKnowledgeBase(format!(
                        "template of '{}' in domain {} has more than one final cursor",
                        entry.label, domain
                    )));
                }

                if entry.template.has_unresolved_markers() {
                    return Err(CompletionError::InvalidKnowledgeBase(format!(
                        "template of '{}' in domain {} has an unparsable placeholder",
                        entry.label, domain
                    )));
                }

                if !entry.kind.is_callable() && entry.template.plain_text() != entry.label {
                    return Err(CompletionError::InvalidKnowledgeBase(format!(
                        "template of '{}' in domain {} must equal its label",
                        entry.label, domain
                    )));
                }
            }
        }

        Ok(())
    }
}
