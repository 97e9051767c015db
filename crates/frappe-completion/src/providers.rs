//! Domain providers and their ordered registry
//!
//! Every knowledge domain is a [`DomainProvider`]: it decides whether it is
//! active for a request and hands back its entries. The [`ProviderRegistry`]
//! keeps providers in evaluation order and the first one whose condition
//! holds wins.

use std::sync::Arc;

use tracing::debug;

use crate::knowledge::{Domain, KnowledgeBase, SymbolEntry};
use crate::trigger::{TriggerCondition, TriggerContext};

/// Marker whose presence anywhere before the cursor activates form events
pub const FORM_EVENTS_MARKER: &str = "frappe.ui.form.on";

/// Characters that make the host invoke the globals domain
pub const GLOBALS_TRIGGER_CHARACTERS: &[char] = &['f', 'c', 'l'];

/// Characters typed inside a handler map that the host should report
pub const FORM_EVENTS_TRIGGER_CHARACTERS: &[char] = &[',', '{', '(', '"', '\''];

/// A pluggable knowledge domain
pub trait DomainProvider: Send + Sync {
    fn domain(&self) -> Domain;

    /// Whether this domain is active for the request
    fn matches(&self, ctx: &TriggerContext<'_>) -> bool;

    /// Characters the host should register as completion triggers for this domain
    fn trigger_characters(&self) -> &[char] {
        &[]
    }

    /// Entries to suggest, in table order
    fn provide<'kb>(&self, knowledge: &'kb KnowledgeBase) -> &'kb [SymbolEntry] {
        knowledge.entries_for(self.domain())
    }
}

/// A domain activated by a [`TriggerCondition`]
///
/// `accepted_characters`, when set, additionally restricts the domain to
/// explicit invocations and the listed trigger characters.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    domain: Domain,
    condition: TriggerCondition,
    trigger_characters: &'static [char],
    accepted_characters: Option<&'static [char]>,
}

impl TriggerRule {
    /// Active when the cursor's line ends with `suffix`; registers `.`
    pub fn suffix(domain: Domain, suffix: &'static str) -> Self {
        Self {
            domain,
            condition: TriggerCondition::LineSuffix(suffix),
            trigger_characters: &['.'],
            accepted_characters: None,
        }
    }

    /// Like [`TriggerRule::suffix`] but trims the line first
    pub fn trimmed_suffix(domain: Domain, suffix: &'static str) -> Self {
        Self {
            condition: TriggerCondition::TrimmedLineSuffix(suffix),
            ..Self::suffix(domain, suffix)
        }
    }

    pub fn contains(domain: Domain, marker: &'static str, trigger_characters: &'static [char]) -> Self {
        Self {
            domain,
            condition: TriggerCondition::DocumentContains(marker),
            trigger_characters,
            accepted_characters: None,
        }
    }

    /// Always active, but only for explicit invocation or one of `characters`
    pub fn always(domain: Domain, characters: &'static [char]) -> Self {
        Self {
            domain,
            condition: TriggerCondition::Always,
            trigger_characters: characters,
            accepted_characters: Some(characters),
        }
    }

    pub fn condition(&self) -> TriggerCondition {
        self.condition
    }
}

impl DomainProvider for TriggerRule {
    fn domain(&self) -> Domain {
        self.domain
    }

    fn matches(&self, ctx: &TriggerContext<'_>) -> bool {
        if let (Some(accepted), Some(ch)) = (self.accepted_characters, ctx.trigger().character()) {
            if !accepted.contains(&ch) {
                return false;
            }
        }
        self.condition.is_met(ctx)
    }

    fn trigger_characters(&self) -> &[char] {
        self.trigger_characters
    }
}

/// Ordered registry of domain providers; also the trigger matcher
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn DomainProvider>>,
}

impl ProviderRegistry {
    /// Create a new empty provider registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the Frappe domains in evaluation order
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_providers();
        registry
    }

    /// Register the Frappe domains.
    ///
    /// Suffix domains come first so that a cursor after `frm.` or
    /// `frappe.` wins over the document-wide form events marker.
    pub fn register_builtin_providers(&mut self) {
        self.register(Arc::new(TriggerRule::suffix(Domain::RootNamespace, "frappe.")));
        self.register(Arc::new(TriggerRule::suffix(Domain::Session, "frappe.session.")));
        self.register(Arc::new(TriggerRule::suffix(Domain::Database, "frappe.db.")));
        self.register(Arc::new(TriggerRule::suffix(Domain::UiNamespace, "frappe.ui.")));
        self.register(Arc::new(TriggerRule::trimmed_suffix(
            Domain::AttachHandler,
            "frappe.ui.form.",
        )));
        self.register(Arc::new(TriggerRule::suffix(Domain::FormInstance, "frm.")));
        self.register(Arc::new(TriggerRule::contains(
            Domain::FormEvents,
            FORM_EVENTS_MARKER,
            FORM_EVENTS_TRIGGER_CHARACTERS,
        )));
        self.register(Arc::new(TriggerRule::always(
            Domain::Globals,
            GLOBALS_TRIGGER_CHARACTERS,
        )));
    }

    /// Register a provider.
    ///
    /// A provider for a domain that is already registered replaces the old
    /// one in place, keeping its position; otherwise it is evaluated last.
    pub fn register(&mut self, provider: Arc<dyn DomainProvider>) {
        match self
            .providers
            .iter()
            .position(|existing| existing.domain() == provider.domain())
        {
            Some(index) => self.providers[index] = provider,
            None => self.providers.push(provider),
        }
    }

    /// Get the provider for a domain
    pub fn get_provider(&self, domain: Domain) -> Option<Arc<dyn DomainProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.domain() == domain)
            .cloned()
    }

    /// Unregister the provider for a domain
    pub fn unregister(&mut self, domain: Domain) -> Option<Arc<dyn DomainProvider>> {
        let index = self
            .providers
            .iter()
            .position(|provider| provider.domain() == domain)?;
        Some(self.providers.remove(index))
    }

    /// Registered domains in evaluation order
    pub fn list_domains(&self) -> Vec<Domain> {
        self.providers.iter().map(|provider| provider.domain()).collect()
    }

    /// First provider whose condition holds
    pub fn find_match(&self, ctx: &TriggerContext<'_>) -> Option<Arc<dyn DomainProvider>> {
        let found = self
            .providers
            .iter()
            .find(|provider| provider.matches(ctx))
            .cloned();

        if let Some(provider) = &found {
            debug!("Trigger matched domain {} at offset {}", provider.domain(), ctx.offset());
        }
        found
    }

    /// Union of all providers' trigger characters, deduplicated, in registration order
    pub fn trigger_characters(&self) -> Vec<char> {
        let mut chars: Vec<char> = Vec::new();
        for ch in self
            .providers
            .iter()
            .flat_map(|provider| provider.trigger_characters().iter().copied())
        {
            if !chars.contains(&ch) {
                chars.push(ch);
            }
        }
        chars
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
