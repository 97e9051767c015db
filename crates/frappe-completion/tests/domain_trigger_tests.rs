//! Integration tests for domain activation through the completion engine

use frappe_completion::{
    tables, CompletionEngine, CompletionTrigger, Domain, FrappeCompletionEngine, InsertTextFormat,
    SymbolKind,
};

/// Suffix-triggered domains and their literal prefixes
const SUFFIX_DOMAINS: &[(Domain, &str)] = &[
    (Domain::RootNamespace, "frappe."),
    (Domain::Session, "frappe.session."),
    (Domain::Database, "frappe.db."),
    (Domain::UiNamespace, "frappe.ui."),
    (Domain::AttachHandler, "frappe.ui.form."),
    (Domain::FormInstance, "frm."),
];

fn complete_at_end(engine: &FrappeCompletionEngine, text: &str, trigger: CompletionTrigger) -> Vec<String> {
    engine
        .complete(text, text.len(), trigger)
        .into_iter()
        .map(|item| item.label)
        .collect()
}

#[test]
fn test_suffix_domains_return_table_in_order() {
    let engine = FrappeCompletionEngine::builtin();

    for (domain, prefix) in SUFFIX_DOMAINS {
        let text = format!("function test() {{\n    {}", prefix);
        let items = engine.complete(&text, text.len(), CompletionTrigger::Character('.'));
        let expected: Vec<String> = tables::entries(*domain)
            .into_iter()
            .map(|entry| entry.label)
            .collect();

        assert!(!items.is_empty(), "no items for {}", domain);
        assert_eq!(
            items.iter().map(|item| item.label.clone()).collect::<Vec<_>>(),
            expected,
            "wrong items for {}",
            domain
        );
        for item in &items {
            assert_eq!(item.filter_text, item.label);
            assert_eq!(item.sort_text, format!("000_{}", item.label));
            assert!(item.preselect);
        }
    }
}

#[test]
fn test_suffix_domains_break_on_extra_character() {
    let engine = FrappeCompletionEngine::builtin();

    for (domain, prefix) in SUFFIX_DOMAINS {
        let text = format!("{}x", prefix);
        assert_ne!(
            engine.active_domain(&text, text.len(), CompletionTrigger::Invoked),
            Some(*domain)
        );
        assert!(engine
            .complete(&text, text.len(), CompletionTrigger::Character('x'))
            .is_empty());
    }
}

#[test]
fn test_root_namespace_get_doc() {
    let engine = FrappeCompletionEngine::builtin();
    let items = engine.complete("frappe.", 7, CompletionTrigger::Character('.'));

    let get_doc = items.iter().find(|item| item.label == "get_doc").unwrap();
    assert_eq!(get_doc.detail, "Get document from server");
    assert_eq!(get_doc.kind, SymbolKind::Method);
    assert_eq!(get_doc.insert_text_format, InsertTextFormat::Snippet);
    assert!(get_doc.insert_text.starts_with("get_doc("));

    let first = get_doc.insert_text.find("${1:").unwrap();
    let second = get_doc.insert_text.find("${2:").unwrap();
    assert!(first < second);
}

#[test]
fn test_form_instance_save() {
    let engine = FrappeCompletionEngine::builtin();
    let text = "frappe.ui.form.on('ToDo', {\n\trefresh(frm) {\n\t\tfrm.";
    let items = engine.complete(text, text.len(), CompletionTrigger::Character('.'));

    let save = items.iter().find(|item| item.label == "save").unwrap();
    assert_eq!(save.insert_text, "save()");
    assert_eq!(save.insert_text_format, InsertTextFormat::PlainText);
}

#[test]
fn test_form_events_marker_at_offset_zero() {
    let engine = FrappeCompletionEngine::builtin();
    let text = "frappe.ui.form.on(\"Sales Order\", {\n\t";

    assert_eq!(
        engine.active_domain(text, text.len(), CompletionTrigger::Character('{')),
        Some(Domain::FormEvents)
    );
    let items = engine.complete(text, text.len(), CompletionTrigger::Invoked);
    assert_eq!(items.len(), 23);
    assert_eq!(items[0].label, "setup");
    assert_eq!(items[0].insert_text, "setup(frm){\n\t$0\n},");
    assert_eq!(items[0].kind, SymbolKind::Function);
}

#[test]
fn test_form_events_stay_active_for_rest_of_document() {
    let engine = FrappeCompletionEngine::builtin();
    let text = "frappe.ui.form.on('ToDo', {});\n\nconst x = 1;\nlet y = ";
    assert_eq!(
        engine.active_domain(text, text.len(), CompletionTrigger::Invoked),
        Some(Domain::FormEvents)
    );
}

#[test]
fn test_globals_with_empty_context() {
    let engine = FrappeCompletionEngine::builtin();
    let labels = complete_at_end(&engine, "", CompletionTrigger::Invoked);
    assert_eq!(
        labels,
        vec!["frappe", "cur_frm", "cur_list", "cur_dialog", "cur_page", "locals"]
    );

    let items = engine.complete("", 0, CompletionTrigger::Invoked);
    assert!(items.iter().all(|item| item.kind == SymbolKind::Variable));
    assert!(items.iter().all(|item| item.insert_text == item.label));
}

#[test]
fn test_globals_trigger_characters() {
    let engine = FrappeCompletionEngine::builtin();
    for ch in ['f', 'c', 'l'] {
        let text = ch.to_string();
        assert_eq!(
            engine.active_domain(&text, 1, CompletionTrigger::Character(ch)),
            Some(Domain::Globals)
        );
    }
    assert!(complete_at_end(&engine, "let x = 1;", CompletionTrigger::Character(';')).is_empty());
}

#[test]
fn test_cursor_in_middle_of_document() {
    let engine = FrappeCompletionEngine::builtin();
    let text = "frappe.db.\nfrm.save();";
    assert_eq!(
        engine.active_domain(text, 10, CompletionTrigger::Character('.')),
        Some(Domain::Database)
    );
}

#[test]
fn test_offset_inside_multibyte_character() {
    let engine = FrappeCompletionEngine::builtin();
    let text = "// é\nfrm.";
    // offset 4 splits the two-byte 'é'
    assert_eq!(
        engine.active_domain(text, 4, CompletionTrigger::Character('.')),
        None
    );
    assert!(!engine
        .complete(text, text.len(), CompletionTrigger::Character('.'))
        .is_empty());
}
