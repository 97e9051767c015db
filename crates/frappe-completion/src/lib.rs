//! Frappe Completion Engine
//!
//! Context-triggered completion for the Frappe client-side scripting API.
//! A fixed knowledge base of API members is partitioned into domains, each
//! activated by a textual trigger over the document up to the cursor.
//!
//! # Architecture
//!
//! 1. **Knowledge Layer**: immutable [`KnowledgeBase`] built once from literal tables
//! 2. **Trigger Layer**: [`TriggerCondition`] predicates evaluated over a [`TriggerContext`]
//! 3. **Provider Layer**: one [`DomainProvider`] per domain, held in evaluation order
//!    by the [`ProviderRegistry`]; the first match wins
//! 4. **Formatting Layer**: [`ItemFormatter`] renders entries into [`CompletionItem`]s
//!    with sort keys, filter keys and snippet or plain-text insert text
//! 5. **Configuration Layer**: [`EngineConfig`] loaded from YAML or JSON
//!
//! # Domains
//!
//! | Domain | Trigger |
//! |---|---|
//! | root namespace | line ends with `frappe.` |
//! | session | line ends with `frappe.session.` |
//! | database | line ends with `frappe.db.` |
//! | UI namespace | line ends with `frappe.ui.` |
//! | attach handler | trimmed line ends with `frappe.ui.form.` |
//! | form instance | line ends with `frm.` |
//! | form events | text before the cursor contains `frappe.ui.form.on` |
//! | globals | always, on invocation or `f`/`c`/`l` |
//!
//! # Example
//!
//! ```
//! use frappe_completion::{CompletionEngine, CompletionTrigger, FrappeCompletionEngine};
//!
//! let engine = FrappeCompletionEngine::builtin();
//! let items = engine.complete("frappe.", 7, CompletionTrigger::Character('.'));
//!
//! assert_eq!(items[0].label, "session");
//! assert!(items.iter().all(|item| item.sort_text.starts_with("000_")));
//! ```
pub mod config;
pub mod engine;
pub mod formatter;
pub mod knowledge;
pub mod providers;
pub mod snippet;
pub mod tables;
pub mod text;
pub mod trigger;
pub mod types;

pub use config::{ConfigFormat, ConfigLoader, EngineConfig, DEFAULT_DOCUMENTATION_URL};
pub use engine::{CompletionEngine, FrappeCompletionEngine};
pub use formatter::{ItemFormatter, SORT_PREFIX};
pub use knowledge::{Domain, KnowledgeBase, SymbolEntry};
pub use providers::{DomainProvider, ProviderRegistry, TriggerRule, FORM_EVENTS_MARKER};
pub use snippet::{Segment, SnippetSyntax, Template};
pub use text::{clamp_offset, line_prefix, offset_at};
pub use trigger::{TriggerCondition, TriggerContext};
pub use types::*;
