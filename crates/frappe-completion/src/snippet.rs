//! Insertable templates
//!
//! A template is a sequence of typed segments: literal text, ordered
//! placeholders with default text, and at most one final-cursor slot. The
//! knowledge tables write templates in the familiar `${1:default}` / `$0`
//! notation; [`Template::parse`] turns that into segments and the
//! formatter renders them back out for whichever syntax the host accepts.

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\d+):([^}]*)\}|\$(\d+)").expect("placeholder pattern"));

/// One piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder { index: u32, default: String },
    FinalCursor,
}

/// Output syntax for a rendered template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetSyntax {
    /// `${n:default}` placeholders and `$0`, as LSP/VS Code snippets
    Snippet,
    /// Defaults inlined, final cursor dropped
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// A template that inserts `text` verbatim
    pub fn text(text: &str) -> Self {
        Self {
            segments: vec![Segment::Text(text.to_string())],
        }
    }

    /// Parse snippet notation. `$0` (or `${0:..}`) becomes the final cursor;
    /// any other number becomes an ordered placeholder.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let (index, default) = match (caps.get(1), caps.get(3)) {
                (Some(index), _) => (index.as_str(), caps.get(2).map_or("", |m| m.as_str())),
                (None, Some(index)) => (index.as_str(), ""),
                (None, None) => continue,
            };
            // An index that does not fit stays in the surrounding text
            let Ok(index) = index.parse::<u32>() else {
                continue;
            };

            if whole.start() > last {
                segments.push(Segment::Text(source[last..whole.start()].to_string()));
            }
            if index == 0 {
                segments.push(Segment::FinalCursor);
            } else {
                segments.push(Segment::Placeholder {
                    index,
                    default: default.to_string(),
                });
            }
            last = whole.end();
        }

        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_string()));
        }

        Self { segments }
    }

    /// Event handler entry inside a `frappe.ui.form.on` handler map:
    /// `label(frm){` block with the cursor in the body, then `,`.
    pub fn event_handler(label: &str) -> Self {
        Self::parse(&format!("{label}(frm){{\n\t$0\n}},"))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder indices in order of appearance
    pub fn placeholder_indices(&self) -> Vec<u32> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Number of final-cursor slots; well-formed templates have at most one
    pub fn final_cursor_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::FinalCursor))
            .count()
    }

    /// Whether any literal text still carries slot notation, which happens
    /// when a placeholder index is too large to parse
    pub fn has_unresolved_markers(&self) -> bool {
        self.segments.iter().any(|segment| match segment {
            Segment::Text(text) => PLACEHOLDER.is_match(text),
            _ => false,
        })
    }

    /// Whether the template has any placeholder or final-cursor slot
    pub fn has_slots(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| !matches!(segment, Segment::Text(_)))
    }

    pub fn render(&self, syntax: SnippetSyntax) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match (segment, syntax) {
                (Segment::Text(text), SnippetSyntax::Snippet) => {
                    out.push_str(&escape(text, &['$', '\\']))
                }
                (Segment::Text(text), SnippetSyntax::PlainText) => out.push_str(text),
                (Segment::Placeholder { index, default }, SnippetSyntax::Snippet) => {
                    out.push_str(&format!("${{{}:{}}}", index, escape(default, &['$', '}', '\\'])))
                }
                (Segment::Placeholder { default, .. }, SnippetSyntax::PlainText) => {
                    out.push_str(default)
                }
                (Segment::FinalCursor, SnippetSyntax::Snippet) => out.push_str("$0"),
                (Segment::FinalCursor, SnippetSyntax::PlainText) => {}
            }
        }
        out
    }

    /// The text with all slot markers stripped and defaults inlined
    pub fn plain_text(&self) -> String {
        self.render(SnippetSyntax::PlainText)
    }
}

fn escape(text: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if special.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        let template = Template::parse("session");
        assert_eq!(template.segments(), &[Segment::Text("session".into())]);
        assert!(!template.has_slots());
    }

    #[test]
    fn test_parse_placeholders() {
        let template = Template::parse("get_doc(\"${1:doctype}\", \"${2:name}\")");
        assert_eq!(template.placeholder_indices(), vec![1, 2]);
        assert_eq!(
            template.segments()[1],
            Segment::Placeholder {
                index: 1,
                default: "doctype".into()
            }
        );
    }

    #[test]
    fn test_parse_final_cursor() {
        let template = Template::parse("run_serially([\n\t$0\n])");
        assert!(template.segments().contains(&Segment::FinalCursor));
        assert!(template.placeholder_indices().is_empty());
    }

    #[test]
    fn test_snippet_render_is_lossless_for_tables() {
        let source = "call({\n\tmethod: \"${1:method_name}\",\n\tcallback: function(r) {\n\t\t$0\n\t}\n})";
        assert_eq!(Template::parse(source).render(SnippetSyntax::Snippet), source);
    }

    #[test]
    fn test_plain_text_render() {
        let template = Template::parse("count(\"${1:doctype}\", {${2:args}})");
        assert_eq!(template.plain_text(), "count(\"doctype\", {args})");
    }

    #[test]
    fn test_event_handler_template() {
        let template = Template::event_handler("refresh");
        assert_eq!(template.render(SnippetSyntax::Snippet), "refresh(frm){\n\t$0\n},");
        assert_eq!(template.plain_text(), "refresh(frm){\n\t\n},");
    }

    #[test]
    fn test_overflowing_index_stays_literal() {
        let template = Template::parse("get(${99999999999:name}, $1)");
        assert_eq!(template.final_cursor_count(), 0);
        assert_eq!(template.placeholder_indices(), vec![1]);
        assert_eq!(
            template.segments()[0],
            Segment::Text("get(${99999999999:name}, ".into())
        );
        assert!(template.has_unresolved_markers());
    }

    #[test]
    fn test_final_cursor_count() {
        assert_eq!(Template::parse("f($0)").final_cursor_count(), 1);
        assert_eq!(Template::parse("f($0, ${0:x})").final_cursor_count(), 2);
        assert!(!Template::parse("f($0)").has_unresolved_markers());
    }

    #[test]
    fn test_escapes_dollar_in_text() {
        let template = Template::text("cost$");
        assert_eq!(template.render(SnippetSyntax::Snippet), "cost\\$");
        assert_eq!(template.plain_text(), "cost$");
    }
}
