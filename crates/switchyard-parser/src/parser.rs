//! Parser for diagram description tokens.
//!
//! Transforms the token stream from the [`lexer`](super::lexer) into a
//! [`Document`](types::Document). The public entry point is
//! [`build_document`].

use winnow::{
    Parser as _,
    combinator::{alt, opt, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) where the failed construct began
    StartOffset(usize),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Run `f`, turning any failure into a cut error that remembers where `f`
/// started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Parse whitespace, newlines and comments
fn trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

fn trivia0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Parse one punctuation token, returning its span
fn punct<'src>(
    input: &mut Input<'src>,
    label: &'static str,
    is_match: fn(&Token<'_>) -> bool,
) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| is_match(&token.token).then_some(token.span))
        .context(Context::Label(label))
        .parse_next(input)
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punct(input, "`,`", |t| matches!(t, Token::Comma))
}

fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("string literal"))
    .parse_next(input)
}

/// Parse a string, `None`/`null` or integer literal
fn scalar<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value>> {
    any.verify_map(|token: &PositionedToken<'_>| {
        let value = match &token.token {
            Token::StringLiteral(s) => types::Value::Str(s.clone()),
            Token::IntegerLiteral(n) => types::Value::Int(*n),
            Token::Null => types::Value::Null,
            _ => return None,
        };
        Some(Spanned::new(value, token.span))
    })
    .parse_next(input)
}

/// Parse comma-separated values up to and including the closing delimiter.
///
/// A trailing comma is allowed. Returns the values and the span of the
/// closing delimiter.
fn values_until<'src>(
    input: &mut Input<'src>,
    label: &'static str,
    is_close: fn(&Token<'_>) -> bool,
) -> IResult<(Vec<Spanned<types::Value>>, Span)> {
    let values: Vec<Spanned<types::Value>> =
        separated(0.., preceded(trivia0, value), (trivia0, comma)).parse_next(input)?;
    opt((trivia0, comma)).parse_next(input)?;
    trivia0.parse_next(input)?;
    let close = punct(input, label, is_close)?;
    Ok((values, close))
}

/// Parse `[a, b]` or `(a, b)`
fn list<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value>> {
    let (open_span, is_bracket) = any
        .verify_map(|token: &PositionedToken<'_>| match token.token {
            Token::LeftBracket => Some((token.span, true)),
            Token::LeftParen => Some((token.span, false)),
            _ => None,
        })
        .parse_next(input)?;

    let (values, close_span) = cut_err(input, |input| {
        if is_bracket {
            values_until(input, "`]`", |t| matches!(t, Token::RightBracket))
        } else {
            values_until(input, "`)`", |t| matches!(t, Token::RightParen))
        }
    })?;

    Ok(Spanned::new(
        types::Value::List(values),
        open_span.union(close_span),
    ))
}

/// Parse `name(a, b)`
fn call<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value>> {
    let name = any
        .verify_map(|token: &PositionedToken<'_>| match token.token {
            Token::Identifier(name) => Some(Spanned::new(name.to_string(), token.span)),
            _ => None,
        })
        .context(Context::Label("element name"))
        .parse_next(input)?;

    preceded(trivia0, |input: &mut Input<'src>| {
        punct(input, "`(`", |t| matches!(t, Token::LeftParen))
    })
    .parse_next(input)?;

    let (args, close_span) = cut_err(input, |input| {
        values_until(input, "`)`", |t| matches!(t, Token::RightParen))
    })?;

    let span = name.span().union(close_span);
    Ok(Spanned::new(types::Value::Call { name, args }, span))
}

fn value<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value>> {
    alt((scalar, list, call))
        .context(Context::Label("diagram element"))
        .parse_next(input)
}

/// Parse one `'text': 'target'` entry
fn link<'src>(input: &mut Input<'src>) -> IResult<types::Link> {
    let text = string_literal.parse_next(input)?;
    trivia0.parse_next(input)?;
    punct(input, "`:`", |t| matches!(t, Token::Colon))?;
    trivia0.parse_next(input)?;
    let target = string_literal.parse_next(input)?;
    Ok(types::Link { text, target })
}

/// Parse `url_map = { 'text': 'target', ... }`
fn url_map<'src>(input: &mut Input<'src>) -> IResult<Vec<types::Link>> {
    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Identifier("url_map")))
        .parse_next(input)?;

    cut_err(input, |input| {
        trivia0.parse_next(input)?;
        punct(input, "`=`", |t| matches!(t, Token::Equals))?;
        trivia0.parse_next(input)?;
        punct(input, "`{`", |t| matches!(t, Token::LeftBrace))?;
        let links: Vec<types::Link> =
            separated(0.., preceded(trivia0, link), (trivia0, comma)).parse_next(input)?;
        opt((trivia0, comma)).parse_next(input)?;
        trivia0.parse_next(input)?;
        punct(input, "`}`", |t| matches!(t, Token::RightBrace))?;
        Ok(links)
    })
    .map_err(|e| {
        e.map(|mut e: ContextError<Context>| {
            e.push(Context::Label("hyperlink map"));
            e
        })
    })
}

fn document<'src>(input: &mut Input<'src>) -> IResult<types::Document> {
    trivia0.parse_next(input)?;
    let diagram = value.parse_next(input)?;
    trivia0.parse_next(input)?;
    let links = opt(url_map).parse_next(input)?.unwrap_or_default();
    trivia0.parse_next(input)?;
    Ok(types::Document { diagram, links })
}

/// Span of the first and last significant tokens in `tokens`.
fn significant_span(tokens: &[PositionedToken<'_>]) -> Option<Span> {
    let mut significant = tokens.iter().filter(|t| !t.token.is_trivia());
    let first = significant.next()?.span;
    let last = significant.next_back().map_or(first, |t| t.span);
    Some(first.union(last))
}

/// Convert a parser error into a [`Diagnostic`].
///
/// The span covers the tokens consumed by the failed construct, or the
/// offending token when nothing was consumed.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let end_offset = tokens.len() - current_remaining;
    let eof_span = || {
        let end = tokens.last().map_or(0, |t| t.span.end());
        Span::new(end..end)
    };

    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => {
            return Diagnostic::error("incomplete input, more tokens expected")
                .with_code(ErrorCode::E101)
                .with_label(eof_span(), "input ends here");
        }
    };

    let start_offset = context
        .context()
        .find_map(|ctx| match ctx {
            Context::StartOffset(n) => Some(tokens.len() - n),
            Context::Label(_) => None,
        })
        .unwrap_or(end_offset);

    let expected: Vec<String> = context
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            Context::StartOffset(_) => None,
        })
        .collect();
    let message = if expected.is_empty() {
        "unexpected token or end of input".to_string()
    } else {
        expected.join(" → ")
    };

    let offending = tokens[end_offset..]
        .iter()
        .find(|t| !t.token.is_trivia())
        .map(|t| t.span);
    let span = match offending {
        Some(span) if start_offset < end_offset => significant_span(&tokens[start_offset..end_offset])
            .map_or(span, |consumed| consumed.union(span)),
        Some(span) => span,
        None => eof_span(),
    };
    let label = match offending {
        Some(_) => "unexpected token",
        None => "input ends here",
    };

    Diagnostic::error(format!("unexpected token: {message}"))
        .with_code(ErrorCode::E100)
        .with_label(span, label)
        .with_help("check brackets, commas and quotes around this point")
}

/// Parse a token stream into a [`Document`](types::Document).
pub fn build_document<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<types::Document, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    let document = match document.parse_next(&mut token_slice) {
        Ok(document) => document,
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            return Err(convert_error(e, tokens, current_remaining));
        }
    };

    let consumed = tokens.len() - token_slice.eof_offset();
    if let Some(trailing) = significant_span(&tokens[consumed..]) {
        return Err(Diagnostic::error("unexpected input after the diagram")
            .with_code(ErrorCode::E101)
            .with_label(trailing, "not part of the diagram")
            .with_help("a description holds one diagram, optionally followed by `url_map = {...}`"));
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(input: &str) -> Result<types::Document, Diagnostic> {
        let tokens = tokenize(input).expect("input should tokenize");
        build_document(&tokens)
    }

    fn parse_value(input: &str) -> types::Value {
        parse(input).expect("input should parse").diagram.into_inner()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_value("'a'"), types::Value::Str("a".to_string()));
        assert_eq!(parse_value("None"), types::Value::Null);
        assert_eq!(parse_value("7"), types::Value::Int(7));
    }

    #[test]
    fn test_nested_lists_and_tuples() {
        let value = parse_value("['line', ('x', 'y'), []]");
        let types::Value::List(items) = value else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(items[1].inner(), types::Value::List(inner) if inner.len() == 2));
        assert!(matches!(items[2].inner(), types::Value::List(inner) if inner.is_empty()));
    }

    #[test]
    fn test_call_with_whitespace_comments_and_trailing_comma() {
        let value = parse_value("loop ( # forward\n  'item',\n  ',', \n)");
        let types::Value::Call { name, args } = value else {
            panic!("expected call");
        };
        assert_eq!(name.inner(), "loop");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_value_spans() {
        let document = parse("  opt('x')  ").unwrap();
        assert_eq!(document.diagram.span(), Span::new(2..10));
    }

    #[test]
    fn test_url_map() {
        let document = parse("'a' url_map = {'a': 'http://a', 'b': \"#b\",}").unwrap();
        assert_eq!(document.links.len(), 2);
        assert_eq!(document.links[0].text.inner(), "a");
        assert_eq!(document.links[1].target.inner(), "#b");
    }

    #[test]
    fn test_missing_close_bracket() {
        let diag = parse("['line', 'a'").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("expected `]`"));
    }

    #[test]
    fn test_missing_comma_points_at_token() {
        let diag = parse("['line' 'a']").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        let span = diag.primary_span().unwrap();
        assert_eq!(span.end(), 11);
    }

    #[test]
    fn test_bare_identifier_is_rejected() {
        let diag = parse("stack").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_trailing_input() {
        let diag = parse("'a' 'b'").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.primary_span(), Some(Span::new(4..7)));
    }

    #[test]
    fn test_empty_input() {
        let diag = parse("  # nothing here\n").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.primary_span(), Some(Span::new(17..17)));
    }

    #[test]
    fn test_malformed_url_map() {
        let diag = parse("'a' url_map = {'a' 'b'}").unwrap_err();
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("hyperlink map"));
    }
}
