//! Tokens produced by the [`lexer`](super::lexer).

use std::fmt;

use crate::span::Span;

/// Token types of the diagram description language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Literals
    StringLiteral(String),
    IntegerLiteral(i64),
    /// `None` or `null`
    Null,
    Identifier(&'src str),

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,
    Colon,        // :
    Equals,       // =

    // Comments
    Comment(&'src str), // # comment

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Whitespace and comments carry no meaning for the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Newline | Token::Comment(_))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLiteral(s) => write!(f, "{s:?}"),
            Token::IntegerLiteral(n) => write!(f, "{n}"),
            Token::Null => write!(f, "None"),
            Token::Identifier(name) => write!(f, "{name}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::Equals => write!(f, "="),
            Token::Comment(text) => write!(f, "#{text}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => writeln!(f),
        }
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}
