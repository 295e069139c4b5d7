//! # Switchyard Parser
//!
//! Reads the textual description of a railroad diagram: a structured
//! literal such as
//!
//! ```text
//! line('SELECT', loop('column', ','), opt('FROM', 'table'))
//! url_map = { 'column': '#column' }
//! ```
//!
//! The pipeline is:
//!
//! 1. **Tokenize** - split the source into tokens
//! 2. **Parse** - build a syntax tree of values and calls
//! 3. **Validate** - report unknown elements and malformed arguments
//! 4. **Lower** - produce a [`Literal`] wrapped between entry and exit
//!    bullets, plus the hyperlink map
//!
//! ```
//! # use switchyard_parser::{parse, ParseError};
//! # use switchyard_core::spec::DiagramSpec;
//! fn main() -> Result<(), ParseError> {
//!     let parsed = parse("opt('+', 'digit')")?;
//!     let spec = DiagramSpec::try_from(parsed.literal()).unwrap();
//!     assert_eq!(spec.tag_name(), "line");
//!     Ok(())
//! }
//! ```

pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;
mod validate;

pub use error::ParseError;
pub use span::{Span, Spanned};

use log::{debug, trace};
use switchyard_core::spec::{DiagramSpec, HyperlinkMap, Literal, SpecError};

/// A parsed description: the diagram and its hyperlinks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDiagram {
    literal: Literal,
    links: HyperlinkMap,
}

impl ParsedDiagram {
    /// The diagram, already wrapped as `line('bullet', ..., 'bullet')`.
    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Terminal text to hyperlink target.
    pub fn links(&self) -> &HyperlinkMap {
        &self.links
    }

    /// Convert the diagram to its typed form.
    pub fn spec(&self) -> Result<DiagramSpec, SpecError> {
        DiagramSpec::try_from(&self.literal)
    }

    pub fn into_parts(self) -> (Literal, HyperlinkMap) {
        (self.literal, self.links)
    }
}

/// Parse a diagram description.
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic of the first phase
/// that failed.
pub fn parse(source: &str) -> Result<ParsedDiagram, ParseError> {
    let tokens = lexer::tokenize(source)?;
    trace!(tokens_count = tokens.len(); "Tokenized diagram description");

    let document = parser::build_document(&tokens)?;
    validate::validate_document(&document)?;

    let literal = document.diagram.inner().to_literal().with_bullets();
    let links: HyperlinkMap = document
        .links
        .into_iter()
        .map(|link| (link.text.into_inner(), link.target.into_inner()))
        .collect();
    debug!(links_count = links.len(); "Parsed diagram description");

    Ok(ParsedDiagram { literal, links })
}
