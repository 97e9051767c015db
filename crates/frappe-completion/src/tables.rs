//! Literal symbol tables for the Frappe client API

use crate::knowledge::{Domain, SymbolEntry};
use crate::snippet::Template;
use crate::types::SymbolKind::{self, Function, Method, Property, Variable};

/// (label, kind, detail, template)
type Row = (&'static str, SymbolKind, &'static str, &'static str);

const ROOT_NAMESPACE: &[Row] = &[
    ("session", Property, "Current user session information", "session"),
    ("user", Property, "Current user information", "user"),
    ("user_roles", Property, "Array of current user roles", "user_roles"),
    ("user_info", Property, "Current user info object", "user_info"),
    ("defaults", Property, "User defaults", "defaults"),
    ("boot", Property, "Boot information", "boot"),
    ("sys_defaults", Property, "System defaults", "sys_defaults"),
    ("form_dict", Property, "Request parameters", "form_dict"),
    ("datetime", Property, "DateTime utilities", "datetime"),
    ("quick_entry", Property, "Current Quick Entry object", "quick_entry"),
    ("route_options", Property, "Route options for navigation", "route_options"),
    // documents
    ("get_doc", Method, "Get document from server", "get_doc(\"${1:doctype}\", \"${2:name}\")"),
    ("new_doc", Method, "Create new document", "new_doc(\"${1:doctype}\")"),
    ("get_list", Method, "Get document list", "get_list(\"${1:doctype}\")"),
    (
        "get_all",
        Method,
        "Get all documents (no permissions)",
        "get_all(\"${1:doctype}\", {filters: {${2:field}: \"${3:value}\"}})",
    ),
    (
        "get_value",
        Method,
        "Get field value",
        "get_value(\"${1:doctype}\", \"${2:name}\", \"${3:fieldname}\")",
    ),
    (
        "set_value",
        Method,
        "Set field value",
        "set_value(\"${1:doctype}\", \"${2:name}\", \"${3:fieldname}\", \"${4:value}\")",
    ),
    ("get_meta", Method, "Get doctype meta", "get_meta(\"${1:doctype}\")"),
    ("get_last_doc", Method, "Get last created document", "get_last_doc(\"${1:doctype}\")"),
    ("get_single", Method, "Get single doctype document", "get_single(\"${1:doctype}\")"),
    ("get_installed_apps", Method, "Get list of installed apps", "get_installed_apps()"),
    // server calls and dialogs
    (
        "call",
        Method,
        "Make server calls",
        "call({\n\tmethod: \"${1:method_name}\",\n\tcallback: function(r) {\n\t\t$0\n\t}\n})",
    ),
    ("msgprint", Method, "Show message to user", "msgprint(\"${1:message}\")"),
    ("throw", Method, "Throw an error", "throw(\"${1:error_message}\")"),
    (
        "confirm",
        Method,
        "Show confirmation dialog",
        "confirm(\"${1:message}\", function() {\n\t$0\n})",
    ),
    ("prompt", Method, "Show prompt dialog", "prompt(\"${1:message}\")"),
    ("show_alert", Method, "Show alert message", "show_alert(\"${1:message}\")"),
    ("hide_msgprint", Method, "Hide message print", "hide_msgprint()"),
    // routing
    ("set_route", Method, "Set route/navigate", "set_route(\"${1:route}\")"),
    ("get_route", Method, "Get current route", "get_route()"),
    // formatting and utilities
    (
        "format_currency",
        Method,
        "Format currency",
        "format_currency(${1:value}, \"${2:currency}\")",
    ),
    ("format_date", Method, "Format date", "format_date(\"${1:date}\")"),
    ("run_serially", Method, "Run tasks serially", "run_serially([\n\t$0\n])"),
    ("xcall", Method, "Make async server call", "xcall(\"${1:method}\")"),
    // sub-namespaces
    ("db", Property, "Database operations", "db"),
    ("ui", Property, "UI components and methods", "ui"),
    ("utils", Property, "Utility functions", "utils"),
    ("model", Property, "Model utilities", "model"),
    ("request", Property, "Request utilities", "request"),
    ("pages", Property, "Page registry", "pages"),
    ("views", Property, "View registry", "views"),
    ("desk", Property, "Desk utilities", "desk"),
    ("workspace", Property, "Workspace methods", "workspace"),
];

const SESSION: &[Row] = &[
    ("user", Property, "Current user ID", "user"),
    ("user_fullname", Property, "Current user full name", "user_fullname"),
    ("user_email", Property, "Current user email", "user_email"),
    ("user_image", Property, "Current user image", "user_image"),
    ("sid", Property, "Session ID", "sid"),
    ("csrf_token", Property, "CSRF token", "csrf_token"),
];

const DATABASE: &[Row] = &[
    (
        "get_value",
        Method,
        "Get single field value",
        "get_value(\"${1:doctype}\", \"${2:filters}\", \"${3:fieldname}\")",
    ),
    (
        "get_single_value",
        Method,
        "Get single doctype field value",
        "get_single_value(\"${1:doctype}\", \"${2:field}\")",
    ),
    ("get_doc", Method, "Get document by name", "get_doc(\"${1:doctype}\", \"${2:name}\")"),
    (
        "get_list",
        Method,
        "Get document list with filters",
        "get_list(\"${1:doctype}\", {fields: [${2:\"name\"}], limit: ${3:20}})",
    ),
    ("exists", Method, "Check if document exists", "exists(\"${1:doctype}\", \"${2:name}\")"),
    (
        "insert",
        Method,
        "Insert new document",
        "insert({\n\tdoctype: \"${1:doctype}\",\n\t$0\n})",
    ),
    ("delete_doc", Method, "Delete document", "delete_doc(\"${1:doctype}\", \"${2:name}\")"),
    ("count", Method, "Count documents", "count(\"${1:doctype}\", {${2:args}})"),
];

const UI_NAMESPACE: &[Row] = &[
    ("form", Property, "Form utilities and methods", "form"),
    ("toolbar", Property, "Toolbar methods", "toolbar"),
    ("Dialog", Property, "Dialog class for creating dialogs", "Dialog"),
    ("make_app", Property, "Make app method", "make_app"),
    ("Page", Property, "Page class", "Page"),
    ("Field", Property, "Field class", "Field"),
];

const ATTACH_HANDLER: &[Row] = &[(
    "on",
    Method,
    "Attach event handlers to a DocType form",
    "on(\"${1:DocType}\", {\n\t${2:refresh}(frm) {\n\t\t$0\n\t}\n});",
)];

const FORM_INSTANCE: &[Row] = &[
    ("doc", Property, "Current document object", "doc"),
    ("doctype", Property, "Document type", "doctype"),
    ("docname", Property, "Document name", "docname"),
    ("fields_dict", Property, "Dictionary of form fields", "fields_dict"),
    ("meta", Property, "Document meta information", "meta"),
    ("is_new", Method, "Check if document is new", "is_new()"),
    ("is_dirty", Method, "Check if form is dirty", "is_dirty()"),
    ("set_value", Method, "Set field value", "set_value(\"${1:fieldname}\", \"${2:value}\")"),
    ("get_field", Method, "Get field object", "get_field(\"${1:fieldname}\")"),
    (
        "set_query",
        Method,
        "Set field query/filter",
        "set_query(\"${1:fieldname}\", function() {\n\treturn {\n\t\tfilters: {\n\t\t\t$0\n\t\t}\n\t};\n})",
    ),
    (
        "set_df_property",
        Method,
        "Set docfield property",
        "set_df_property(\"${1:fieldname}\", \"${2:property}\", ${3:value})",
    ),
    // visibility
    (
        "toggle_display",
        Method,
        "Toggle field display",
        "toggle_display(\"${1:fieldname}\", ${2:show})",
    ),
    (
        "toggle_reqd",
        Method,
        "Toggle field required",
        "toggle_reqd(\"${1:fieldname}\", ${2:required})",
    ),
    (
        "toggle_enable",
        Method,
        "Toggle field enable",
        "toggle_enable(\"${1:fieldname}\", ${2:enable})",
    ),
    ("set_intro", Method, "Set form intro message", "set_intro(\"${1:message}\")"),
    ("clear_intro", Method, "Clear form intro", "clear_intro()"),
    // buttons
    (
        "add_custom_button",
        Method,
        "Add custom button",
        "add_custom_button(\"${1:label}\", function() {\n\t$0\n})",
    ),
    (
        "remove_custom_button",
        Method,
        "Remove custom button",
        "remove_custom_button(\"${1:label}\")",
    ),
    ("clear_custom_buttons", Method, "Clear all custom buttons", "clear_custom_buttons()"),
    // document lifecycle
    ("save", Method, "Save form", "save()"),
    ("submit", Method, "Submit form", "submit()"),
    ("cancel", Method, "Cancel form", "cancel()"),
    ("reload_doc", Method, "Reload document", "reload_doc()"),
    ("refresh", Method, "Refresh form", "refresh()"),
    ("refresh_field", Method, "Refresh specific field", "refresh_field(\"${1:fieldname}\")"),
    (
        "refresh_fields",
        Method,
        "Refresh multiple fields",
        "refresh_fields([\"${1:fieldname1}\", \"${2:fieldname2}\"])",
    ),
    (
        "call",
        Method,
        "Call server method",
        "call({\n\tmethod: \"${1:method_name}\",\n\tcallback: function(r) {\n\t\t$0\n\t}\n})",
    ),
    ("trigger", Method, "Trigger field event", "trigger(\"${1:fieldname}\")"),
    // child tables
    ("add_child", Method, "Add child table row", "add_child(\"${1:fieldname}\")"),
    ("clear_table", Method, "Clear child table", "clear_table(\"${1:fieldname}\")"),
    // layout
    ("layout", Property, "Form layout object", "layout"),
    ("sidebar", Property, "Form sidebar", "sidebar"),
    ("toolbar", Property, "Form toolbar", "toolbar"),
    ("dashboard", Property, "Form dashboard", "dashboard"),
    ("page", Property, "Page object", "page"),
    ("set_title", Method, "Set page title", "set_title(\"${1:title}\")"),
];

/// (label, detail); templates come from [`Template::event_handler`]
const FORM_EVENTS: &[(&str, &str)] = &[
    ("setup", "Triggered once when the form is created for the first time"),
    ("before_load", "Triggered before the form is about to load"),
    ("onload", "Triggered when the form is loaded and is about to render"),
    ("refresh", "Triggered when the form is loaded and rendered"),
    ("onload_post_render", "Triggered after the form is loaded and rendered"),
    ("validate", "Triggered before before_save"),
    ("before_save", "Triggered before save is called"),
    ("after_save", "Triggered after form is saved"),
    ("before_submit", "Triggered before submit is called"),
    ("on_submit", "Triggered after form is submitted"),
    ("before_cancel", "Triggered before cancel is called"),
    ("after_cancel", "Triggered after form is cancelled"),
    ("before_discard", "Triggered before discard is called"),
    ("after_discard", "Triggered after form is discarded"),
    ("timeline_refresh", "Triggered after form timeline is rendered"),
    // field change events
    ("company", "Triggered when company field is changed"),
    ("customer", "Triggered when customer field is changed"),
    ("item_code", "Triggered when item_code field is changed"),
    // child table events
    ("items_add", "Triggered when a row is added to items child table"),
    ("items_move", "Triggered when a row is moved in items child table"),
    ("before_items_remove", "Triggered before a row is removed from items child table"),
    ("items_remove", "Triggered when a row is removed from items child table"),
    ("items_on_form_rendered", "Triggered when a row is opened as a form in items table"),
];

/// (label, detail); globals are variables whose template is the label
const GLOBALS: &[(&str, &str)] = &[
    ("frappe", "Main Frappe object"),
    ("cur_frm", "Current form object"),
    ("cur_list", "Current list object"),
    ("cur_dialog", "Current open dialog"),
    ("cur_page", "Current page object"),
    ("locals", "All loaded documents and DocTypes"),
];

fn rows(rows: &[Row]) -> Vec<SymbolEntry> {
    rows.iter()
        .map(|(label, kind, detail, template)| {
            SymbolEntry::new(label, *kind, detail, Template::parse(template))
        })
        .collect()
}

/// Table entries for a domain, in table order
pub fn entries(domain: Domain) -> Vec<SymbolEntry> {
    match domain {
        Domain::RootNamespace => rows(ROOT_NAMESPACE),
        Domain::Session => rows(SESSION),
        Domain::Database => rows(DATABASE),
        Domain::UiNamespace => rows(UI_NAMESPACE),
        Domain::AttachHandler => rows(ATTACH_HANDLER),
        Domain::FormInstance => rows(FORM_INSTANCE),
        Domain::FormEvents => FORM_EVENTS
            .iter()
            .map(|(label, detail)| {
                SymbolEntry::new(label, Function, detail, Template::event_handler(label))
            })
            .collect(),
        Domain::Globals => GLOBALS
            .iter()
            .map(|(label, detail)| SymbolEntry::plain(label, Variable, detail))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(entries(Domain::Session).len(), 6);
        assert_eq!(entries(Domain::Database).len(), 8);
        assert_eq!(entries(Domain::UiNamespace).len(), 6);
        assert_eq!(entries(Domain::AttachHandler).len(), 1);
        assert_eq!(entries(Domain::FormEvents).len(), 23);
        assert_eq!(entries(Domain::Globals).len(), 6);
    }

    #[test]
    fn test_event_entries_are_functions() {
        for entry in entries(Domain::FormEvents) {
            assert_eq!(entry.kind, Function);
            assert!(entry.template.plain_text().ends_with("},"));
        }
    }

    #[test]
    fn test_attach_handler_has_nested_handler() {
        let entry = &entries(Domain::AttachHandler)[0];
        assert_eq!(entry.template.placeholder_indices(), vec![1, 2]);
        assert!(entry.template.plain_text().contains("refresh(frm) {"));
    }
}
