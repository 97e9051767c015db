//! Trigger conditions
//!
//! A trigger condition is a textual predicate over the document up to the
//! cursor. Two strategies coexist:
//!
//! - suffix triggers look only at the cursor's line (`frappe.`, `frm.`, ...)
//! - the contains trigger scans everything before the cursor for a marker
//!
//! The contains trigger is deliberately loose: once `frappe.ui.form.on`
//! appears anywhere above the cursor it stays active for the rest of the
//! document.

use crate::text::{clamp_offset, line_prefix};
use crate::types::CompletionTrigger;

/// The inputs a trigger condition is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext<'a> {
    text: &'a str,
    offset: usize,
    trigger: CompletionTrigger,
}

impl<'a> TriggerContext<'a> {
    /// Out-of-range offsets are clamped to the text
    pub fn new(text: &'a str, offset: usize, trigger: CompletionTrigger) -> Self {
        Self {
            text,
            offset: clamp_offset(text, offset),
            trigger,
        }
    }

    /// Document text from offset 0 up to the cursor
    pub fn text_before(&self) -> &'a str {
        &self.text[..self.offset]
    }

    /// Current line up to the cursor
    pub fn line_prefix(&self) -> &'a str {
        line_prefix(self.text, self.offset)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn trigger(&self) -> CompletionTrigger {
        self.trigger
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCondition {
    /// Line prefix ends exactly with the literal
    LineSuffix(&'static str),
    /// Line prefix, whitespace-trimmed, ends with the literal
    TrimmedLineSuffix(&'static str),
    /// Text before the cursor contains the literal anywhere
    DocumentContains(&'static str),
    /// No textual condition
    Always,
}

impl TriggerCondition {
    pub fn is_met(&self, ctx: &TriggerContext<'_>) -> bool {
        match self {
            TriggerCondition::LineSuffix(suffix) => ctx.line_prefix().ends_with(suffix),
            TriggerCondition::TrimmedLineSuffix(suffix) => {
                ctx.line_prefix().trim().ends_with(suffix)
            }
            TriggerCondition::DocumentContains(marker) => ctx.text_before().contains(marker),
            TriggerCondition::Always => true,
        }
    }
}
