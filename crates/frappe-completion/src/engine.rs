//! Completion dispatcher
//!
//! The engine is the per-request entry point. It asks the provider registry
//! which domain is active, fetches that domain's entries from the knowledge
//! base and renders each one through the item formatter.
//!
//! # Example
//!
//! ```
//! use frappe_completion::{CompletionEngine, CompletionTrigger, FrappeCompletionEngine};
//!
//! let engine = FrappeCompletionEngine::builtin();
//! let items = engine.complete("frm.", 4, CompletionTrigger::Character('.'));
//! assert!(items.iter().any(|item| item.label == "save"));
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::formatter::ItemFormatter;
use crate::knowledge::{Domain, KnowledgeBase};
use crate::providers::ProviderRegistry;
use crate::snippet::SnippetSyntax;
use crate::trigger::TriggerContext;
use crate::types::{CompletionItem, CompletionTrigger};

/// Main completion engine trait
///
/// Implementations are pure functions of their inputs: the same text,
/// offset and trigger always produce the same ordered items. An empty
/// vector means "no suggestions".
pub trait CompletionEngine: Send + Sync {
    /// Suggestions for the cursor at byte `offset` in `text`
    fn complete(&self, text: &str, offset: usize, trigger: CompletionTrigger) -> Vec<CompletionItem>;

    /// The domain that would serve this request, if any
    fn active_domain(&self, text: &str, offset: usize, trigger: CompletionTrigger) -> Option<Domain>;
}

/// Completion engine over the Frappe knowledge base
pub struct FrappeCompletionEngine {
    knowledge: Arc<KnowledgeBase>,
    registry: ProviderRegistry,
    formatter: ItemFormatter,
}

impl FrappeCompletionEngine {
    /// Assemble an engine from its parts. `registry` decides the domain and
    /// `knowledge` supplies its entries, which `formatter` renders.
    pub fn new(knowledge: Arc<KnowledgeBase>, registry: ProviderRegistry, formatter: ItemFormatter) -> Self {
        Self {
            knowledge,
            registry,
            formatter,
        }
    }

    /// Built-in tables and domains with default formatting
    pub fn builtin() -> Self {
        Self::new(
            KnowledgeBase::shared(),
            ProviderRegistry::with_builtin_providers(),
            ItemFormatter::default(),
        )
    }

    /// Built-in tables and domains, formatted per `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        let syntax = if config.snippet_support {
            SnippetSyntax::Snippet
        } else {
            SnippetSyntax::PlainText
        };
        Self::new(
            KnowledgeBase::shared(),
            ProviderRegistry::with_builtin_providers(),
            ItemFormatter::new(config.doc_link().map(str::to_string), syntax),
        )
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn formatter(&self) -> &ItemFormatter {
        &self.formatter
    }

    /// Complete with an explicit output syntax, e.g. for a client that
    /// cannot expand snippets
    pub fn complete_with_syntax(
        &self,
        text: &str,
        offset: usize,
        trigger: CompletionTrigger,
        syntax: SnippetSyntax,
    ) -> Vec<CompletionItem> {
        if syntax == self.formatter.syntax() {
            return self.complete(text, offset, trigger);
        }
        let formatter = self.formatter.with_syntax(syntax);
        self.dispatch(text, offset, trigger, &formatter)
    }

    fn dispatch(
        &self,
        text: &str,
        offset: usize,
        trigger: CompletionTrigger,
        formatter: &ItemFormatter,
    ) -> Vec<CompletionItem> {
        let ctx = TriggerContext::new(text, offset, trigger);

        let Some(provider) = self.registry.find_match(&ctx) else {
            debug!("No completion domain active at offset {}", ctx.offset());
            return Vec::new();
        };

        let items: Vec<CompletionItem> = provider
            .provide(&self.knowledge)
            .iter()
            .map(|entry| formatter.format(entry))
            .collect();

        debug!("Generated {} completions for domain {}", items.len(), provider.domain());
        items
    }
}

impl CompletionEngine for FrappeCompletionEngine {
    fn complete(&self, text: &str, offset: usize, trigger: CompletionTrigger) -> Vec<CompletionItem> {
        self.dispatch(text, offset, trigger, &self.formatter)
    }

    fn active_domain(&self, text: &str, offset: usize, trigger: CompletionTrigger) -> Option<Domain> {
        let ctx = TriggerContext::new(text, offset, trigger);
        self.registry.find_match(&ctx).map(|provider| provider.domain())
    }
}
