//! Structural checks on a parsed [`Document`].
//!
//! The parser accepts any nesting of values. Validation reports the
//! values that cannot become a diagram, with source spans, before the
//! document is lowered to a [`Literal`](switchyard_core::spec::Literal).

use std::collections::HashMap;

use switchyard_core::spec::{KNOWN_TAGS, TagArity, tag_arity};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{Document, Link, Value},
    span::{Span, Spanned},
};

struct Validator {
    diagnostics: DiagnosticCollector,
}

impl Validator {
    fn new() -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn visit(&mut self, value: &Spanned<Value>) {
        match value.inner() {
            Value::Null | Value::Str(_) => {}
            Value::Int(n) => self.diagnostics.emit(
                Diagnostic::error(format!("expected a diagram element, found integer `{n}`"))
                    .with_code(ErrorCode::E203)
                    .with_label(value.span(), ErrorCode::E203.description())
                    .with_help("quote it to draw the number as text"),
            ),
            Value::List(items) if items.is_empty() => {}
            Value::List(_) | Value::Call { .. } => self.visit_tagged(value),
        }
    }

    fn visit_tagged(&mut self, value: &Spanned<Value>) {
        let node = value.inner();
        let args = node.args();

        let Some((tag, tag_span)) = node.tag() else {
            let first_span = args.first().map_or(value.span(), Spanned::span);
            self.diagnostics.emit(
                Diagnostic::error("list does not start with an element name")
                    .with_code(ErrorCode::E200)
                    .with_label(first_span, "expected an element name here")
                    .with_help("start the list with a name such as `'line'` or `'or'`"),
            );
            args.iter().for_each(|arg| self.visit(arg));
            return;
        };

        match tag_arity(tag) {
            None => self.diagnostics.emit(
                Diagnostic::error(format!("unknown diagram element `{tag}`"))
                    .with_code(ErrorCode::E200)
                    .with_label(tag_span, ErrorCode::E200.description())
                    .with_help(format!("expected one of {}", known_tags())),
            ),
            Some(TagArity::Children) => {}
            Some(TagArity::Pair) if args.len() != 2 => self.diagnostics.emit(
                Diagnostic::error(format!(
                    "`{tag}` takes 2 arguments but {} were given",
                    args.len()
                ))
                .with_code(ErrorCode::E201)
                .with_label(value.span(), ErrorCode::E201.description())
                .with_secondary_label(tag_span, "a forward and a backward path are required"),
            ),
            Some(TagArity::Pair) => {}
            Some(TagArity::IndentedChildren) => {
                self.check_indent(tag, tag_span, args.first());
                args.iter().skip(1).for_each(|arg| self.visit(arg));
                return;
            }
        }

        args.iter().for_each(|arg| self.visit(arg));
    }

    fn check_indent(&mut self, tag: &str, tag_span: Span, width: Option<&Spanned<Value>>) {
        let span = match width {
            Some(width) if matches!(width.inner(), Value::Int(n) if *n >= 0) => return,
            Some(width) => width.span(),
            None => tag_span,
        };
        self.diagnostics.emit(
            Diagnostic::error(format!("`{tag}` needs a non-negative integer width"))
                .with_code(ErrorCode::E202)
                .with_label(span, ErrorCode::E202.description())
                .with_help(format!("write the width first: `{tag}(2, ...)`")),
        );
    }

    /// Later entries override earlier ones; repeats are reported as warnings.
    fn check_links(&mut self, links: &[Link]) {
        let mut seen: HashMap<&str, Span> = HashMap::new();
        for link in links {
            if let Some(first) = seen.insert(link.text.inner(), link.text.span()) {
                self.diagnostics.emit(
                    Diagnostic::warning(format!(
                        "hyperlink for `{}` is defined more than once",
                        link.text.inner()
                    ))
                    .with_code(ErrorCode::E204)
                    .with_label(link.text.span(), "this target is used")
                    .with_secondary_label(first, "earlier definition ignored"),
                );
            }
        }
    }

    fn finish(self) -> Result<(), ParseError> {
        self.diagnostics.finish()
    }
}

fn known_tags() -> String {
    KNOWN_TAGS
        .iter()
        .map(|tag| format!("`{tag}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check that `document` describes a drawable diagram.
pub fn validate_document(document: &Document) -> Result<(), ParseError> {
    let mut validator = Validator::new();
    validator.visit(&document.diagram);
    validator.check_links(&document.links);
    validator.finish()
}
