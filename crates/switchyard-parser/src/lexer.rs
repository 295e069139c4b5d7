//! Lexical analyzer for diagram descriptions.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, delimited, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = Result<O, ErrMode<ContextError<LexerDiagnostic>>>;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse `\u{XXXX}` after the backslash, starting with 'u'.
fn string_escape_unicode(input: &mut Input<'_>, escape_start: usize) -> IResult<char> {
    preceded(
        'u',
        cut_err(
            delimited(
                '{',
                take_while(1..=6, |c: char| c.is_ascii_hexdigit()).context(LexerDiagnostic {
                    code: ErrorCode::E006,
                    message: "empty unicode escape",
                    help: Some("provide 1-6 hex digits: `\\u{2192}`"),
                    start: escape_start,
                }),
                '}',
            )
            .context(LexerDiagnostic {
                code: ErrorCode::E004,
                message: "invalid unicode escape",
                help: Some("use format `\\u{XXXX}` with 1-6 hex digits"),
                start: escape_start,
            })
            .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
            .context(LexerDiagnostic {
                code: ErrorCode::E005,
                message: "invalid unicode codepoint",
                help: Some("valid range: `0x0000`-`0xD7FF` or `0xE000`-`0x10FFFF`"),
                start: escape_start,
            }),
        ),
    )
    .parse_next(input)
}

fn string_escape_char(input: &mut Input<'_>) -> IResult<char> {
    one_of(['n', 'r', 't', '\\', '\'', '"', '0'])
        .map(|c| match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            other => other,
        })
        .parse_next(input)
}

fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    match string_escape_unicode(input, escape_start) {
        Ok(ch) => return Ok(ch),
        Err(ErrMode::Backtrack(_)) => {}
        Err(e) => return Err(e),
    }

    if let Ok(ch) = string_escape_char(input) {
        return Ok(ch);
    }

    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\n`, `\\r`, `\\t`, `\\\\`, `\\'`, `\\\"`, `\\0`, `\\u{}`"),
            start: escape_start,
        },
    )))
}

/// Parse a single- or double-quoted string literal.
///
/// The closing quote must match the opening one; the other quote kind may
/// appear unescaped inside.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    let quote = one_of(['\'', '"']).parse_next(input)?;

    let string_char = none_of(move |c: char| c == quote || c == '\\' || c == '\n' || c == '\r');
    let string_content =
        repeat(0.., alt((string_escape, string_char))).fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    cut_err(terminated(string_content, quote))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("close the string with the quote it was opened with"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringLiteral)
}

/// Parse an optionally negative decimal integer.
fn integer_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    let digits = (opt('-'), digit1).take().parse_next(input)?;
    peek(not(one_of(is_word_char))).parse_next(input)?;

    digits
        .parse::<i64>()
        .map(Token::IntegerLiteral)
        .map_err(|_| {
            ErrMode::Cut(ContextError::new().add_context(
                input,
                &input.checkpoint(),
                LexerDiagnostic {
                    code: ErrorCode::E007,
                    message: "integer literal out of range",
                    help: Some("integers must fit in 64 bits"),
                    start: start_pos,
                },
            ))
        })
}

fn comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded('#', take_while(0.., |c| c != '\n'))
        .map(Token::Comment)
        .parse_next(input)
}

/// Parse the null keywords with word boundary checking
fn null_keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((literal("None"), literal("null"))),
        peek(not(one_of(is_word_char))),
    )
    .value(Token::Null)
    .parse_next(input)
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., is_word_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        ','.value(Token::Comma),
        ':'.value(Token::Colon),
        '='.value(Token::Equals),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        comment,
        string_literal,
        integer_literal,
        null_keyword, // Must come before identifier
        identifier,
        single_char_token,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    // Resume after the offending character.
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert a winnow error into a [`Diagnostic`].
    ///
    /// Falls back to E002 (unexpected character) if no [`LexerDiagnostic`]
    /// context is attached.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..error_pos), code.description());
            if let Some(help) = help {
                diag = diag.with_help(*help);
            }
            return diag;
        }

        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(
                Span::new(error_pos..error_pos.saturating_add(1)),
                ErrorCode::E002.description(),
            )
    }
}

/// Split source text into positioned tokens.
///
/// Lexing continues past errors so that every problem in the input is
/// reported at once.
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("input should tokenize")
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    fn first_error_code(input: &str) -> Option<ErrorCode> {
        tokenize(input)
            .expect_err("input should fail to tokenize")
            .diagnostics()
            .first()
            .and_then(|d| d.code())
    }

    #[test]
    fn test_punctuation_and_identifiers() {
        assert_eq!(
            significant("loop(['a'], ',')"),
            vec![
                Token::Identifier("loop"),
                Token::LeftParen,
                Token::LeftBracket,
                Token::StringLiteral("a".to_string()),
                Token::RightBracket,
                Token::Comma,
                Token::StringLiteral(",".to_string()),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_both_quote_styles() {
        assert_eq!(
            significant(r#"'say "hi"' "it's""#),
            vec![
                Token::StringLiteral("say \"hi\"".to_string()),
                Token::StringLiteral("it's".to_string()),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            significant(r"'a\'b\\c\n\u{2192}'"),
            vec![Token::StringLiteral("a'b\\c\n\u{2192}".to_string())]
        );
    }

    #[test]
    fn test_null_keywords_respect_word_boundaries() {
        assert_eq!(significant("None"), vec![Token::Null]);
        assert_eq!(significant("null"), vec![Token::Null]);
        assert_eq!(significant("Nonesuch"), vec![Token::Identifier("Nonesuch")]);
        assert_eq!(significant("null_rule"), vec![Token::Identifier("null_rule")]);
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            significant("2 -3 0"),
            vec![
                Token::IntegerLiteral(2),
                Token::IntegerLiteral(-3),
                Token::IntegerLiteral(0),
            ]
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        let tokens = tokenize("'a' # trailing comment\n'b'").unwrap();
        assert!(
            tokens
                .iter()
                .any(|t| t.token == Token::Comment(" trailing comment"))
        );
        assert_eq!(
            significant("'a' # trailing comment\n'b'"),
            vec![
                Token::StringLiteral("a".to_string()),
                Token::StringLiteral("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_token_spans() {
        let tokens = tokenize("opt('x')").unwrap();
        assert_eq!(tokens[0].span, Span::new(0..3));
        assert_eq!(tokens[1].span, Span::new(3..4));
        assert_eq!(tokens[2].span, Span::new(4..7));
        assert_eq!(tokens[3].span, Span::new(7..8));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("'abc\n").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span().start(), 0);
    }

    #[test]
    fn test_mismatched_quotes_are_unterminated() {
        assert_eq!(first_error_code("'abc\""), Some(ErrorCode::E001));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("'a' ; 'b'").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E002));
        assert_eq!(diag.labels()[0].span(), Span::new(4..5));
    }

    #[test]
    fn test_escape_errors() {
        assert_eq!(first_error_code(r"'\q'"), Some(ErrorCode::E003));
        assert_eq!(first_error_code(r"'\u{zz}'"), Some(ErrorCode::E006));
        assert_eq!(first_error_code(r"'\u{D800}'"), Some(ErrorCode::E005));
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(
            first_error_code("99999999999999999999"),
            Some(ErrorCode::E007)
        );
    }

    #[test]
    fn test_multiple_errors_collected() {
        let err = tokenize("; 'a' ;").unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
    }
}
