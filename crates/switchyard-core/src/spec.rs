//! Diagram descriptions.
//!
//! A railroad diagram is described twice over:
//!
//! - [`Literal`] is the untyped structured-literal tree: strings, integers,
//!   nulls and nested lists. It is what the parser produces and what callers
//!   build by hand. A list starting with a string is a *tagged node*, e.g.
//!   `['loop', 'item', ',']`.
//! - [`DiagramSpec`] is the typed tree the layout engine walks. It is obtained
//!   from a literal with [`DiagramSpec::try_from`], which rejects unknown tags
//!   and malformed arguments.
//!
//! ```
//! # use switchyard_core::spec::{DiagramSpec, Literal};
//! let literal = Literal::tagged("opt", [Literal::from("'+'"), Literal::Null]);
//! let spec = DiagramSpec::try_from(&literal).unwrap();
//! assert_eq!(spec.tag_name(), "opt");
//!
//! let bogus = Literal::tagged("bogus-tag", []);
//! assert!(DiagramSpec::try_from(&bogus).is_err());
//! ```

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

/// Maps terminal text to hyperlink targets.
pub type HyperlinkMap = IndexMap<String, String>;

/// The special terminal drawn as a small filled circle.
pub const BULLET: &str = "bullet";

/// Errors raised while converting a [`Literal`] into a [`DiagramSpec`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("invalid diagram tag `{0}`")]
    InvalidSpecTag(String),

    #[error("invalid arguments for `{tag}`: {reason}")]
    InvalidArguments { tag: String, reason: String },
}

/// Argument shape expected by a diagram tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagArity {
    /// Any number of child elements
    Children,
    /// Exactly a forward and a backward path
    Pair,
    /// A non-negative integer width followed by any number of rows
    IndentedChildren,
}

/// Every tag [`DiagramSpec::try_from`] accepts, in documentation order.
pub const KNOWN_TAGS: &[&str] = &[
    "line",
    "backline",
    "stack",
    "indentstack",
    "rightstack",
    "loop",
    "toploop",
    "or",
    "choice",
    "tailbranch",
    "opt",
    "optx",
    "optloop",
];

/// Returns the argument shape of a known tag, or `None` for unknown tags.
///
/// ```
/// # use switchyard_core::spec::{tag_arity, TagArity};
/// assert_eq!(tag_arity("loop"), Some(TagArity::Pair));
/// assert_eq!(tag_arity("zigzag"), None);
/// ```
pub fn tag_arity(tag: &str) -> Option<TagArity> {
    match tag {
        "loop" | "toploop" | "optloop" => Some(TagArity::Pair),
        "indentstack" => Some(TagArity::IndentedChildren),
        tag if KNOWN_TAGS.contains(&tag) => Some(TagArity::Children),
        _ => None,
    }
}

/// Untyped structured-literal form of a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Null,
    Str(String),
    Int(i64),
    List(Vec<Literal>),
}

impl Literal {
    /// Builds the tagged node `[tag, args...]`.
    pub fn tagged(tag: &str, args: impl IntoIterator<Item = Literal>) -> Self {
        Self::List(
            std::iter::once(Self::Str(tag.to_string()))
                .chain(args)
                .collect(),
        )
    }

    /// Wraps a diagram between two bullets, the shape of every top-level
    /// diagram.
    pub fn with_bullets(self) -> Self {
        Self::tagged(
            "line",
            [Self::from(BULLET), self, Self::from(BULLET)],
        )
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<Literal>> for Literal {
    fn from(value: Vec<Literal>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Leaf of a diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Pass-through: a short plain rail with no node.
    Skip,
    /// The entry/exit marker drawn as a small filled circle.
    Bullet,
    /// A token, literal or rule reference drawn as a bubble.
    Text(String),
}

/// Horizontal placement of the rows of a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAlign {
    /// Rows start at the left rail.
    Flush,
    /// Rows start `n` horizontal separations right of the left rail.
    Indent(u32),
    /// Each row ends under the exit of the row above it.
    Right,
}

/// Which side of an optional block the skip path runs on.
///
/// Named for where the skip rail sits, not the content: `Top` is the
/// `[skip, content]` alternation written `opt(...)`, often called a
/// "bypass bottom" optional elsewhere. `Bottom` is `[content, skip]`,
/// written `optx(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassSide {
    /// The skip path is the straight top rail; the content hangs below it.
    Top,
    /// The content is on the straight rail; the skip path runs below it.
    Bottom,
}

/// Typed diagram tree consumed by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramSpec {
    Terminal(Terminal),
    Sequence(Vec<DiagramSpec>),
    BackwardSequence(Vec<DiagramSpec>),
    Stack {
        align: StackAlign,
        rows: Vec<DiagramSpec>,
    },
    Loop {
        forward: Box<DiagramSpec>,
        backward: Box<DiagramSpec>,
    },
    TopLoop {
        forward: Box<DiagramSpec>,
        backward: Box<DiagramSpec>,
    },
    Alternation(Vec<DiagramSpec>),
    Optional {
        children: Vec<DiagramSpec>,
        bypass: BypassSide,
    },
    OptionalLoop {
        forward: Box<DiagramSpec>,
        backward: Box<DiagramSpec>,
    },
}

impl DiagramSpec {
    pub fn skip() -> Self {
        Self::Terminal(Terminal::Skip)
    }

    pub fn bullet() -> Self {
        Self::Terminal(Terminal::Bullet)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Terminal(Terminal::Text(text.into()))
    }

    pub fn sequence(children: impl IntoIterator<Item = DiagramSpec>) -> Self {
        Self::Sequence(children.into_iter().collect())
    }

    pub fn alternation(branches: impl IntoIterator<Item = DiagramSpec>) -> Self {
        Self::Alternation(branches.into_iter().collect())
    }

    pub fn stack(align: StackAlign, rows: impl IntoIterator<Item = DiagramSpec>) -> Self {
        Self::Stack {
            align,
            rows: rows.into_iter().collect(),
        }
    }

    pub fn looped(forward: DiagramSpec, backward: DiagramSpec) -> Self {
        Self::Loop {
            forward: Box::new(forward),
            backward: Box::new(backward),
        }
    }

    pub fn top_looped(forward: DiagramSpec, backward: DiagramSpec) -> Self {
        Self::TopLoop {
            forward: Box::new(forward),
            backward: Box::new(backward),
        }
    }

    pub fn optional(bypass: BypassSide, children: impl IntoIterator<Item = DiagramSpec>) -> Self {
        Self::Optional {
            children: children.into_iter().collect(),
            bypass,
        }
    }

    /// Returns the literal tag this node is written with.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Terminal(_) => "terminal",
            Self::Sequence(_) => "line",
            Self::BackwardSequence(_) => "backline",
            Self::Stack { align, .. } => match align {
                StackAlign::Flush => "stack",
                StackAlign::Indent(_) => "indentstack",
                StackAlign::Right => "rightstack",
            },
            Self::Loop { .. } => "loop",
            Self::TopLoop { .. } => "toploop",
            Self::Alternation(_) => "or",
            Self::Optional { bypass, .. } => match bypass {
                BypassSide::Top => "opt",
                BypassSide::Bottom => "optx",
            },
            Self::OptionalLoop { .. } => "optloop",
        }
    }

    fn from_tagged(tag: &str, args: &[Literal]) -> Result<Self, SpecError> {
        let invalid = |reason: &str| SpecError::InvalidArguments {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };
        let children = |args: &[Literal]| -> Result<Vec<DiagramSpec>, SpecError> {
            args.iter().map(DiagramSpec::try_from).collect()
        };
        let pair = |args: &[Literal]| -> Result<(Box<DiagramSpec>, Box<DiagramSpec>), SpecError> {
            match args {
                [forward, backward] => Ok((
                    Box::new(DiagramSpec::try_from(forward)?),
                    Box::new(DiagramSpec::try_from(backward)?),
                )),
                _ => Err(invalid("expected a forward and a backward path")),
            }
        };

        if tag_arity(tag).is_none() {
            return Err(SpecError::InvalidSpecTag(tag.to_string()));
        }

        let spec = match tag {
            "line" => Self::Sequence(children(args)?),
            "backline" => Self::BackwardSequence(children(args)?),
            "stack" => Self::stack(StackAlign::Flush, children(args)?),
            "rightstack" => Self::stack(StackAlign::Right, children(args)?),
            "indentstack" => {
                let (indent, rows) = match args {
                    [Literal::Int(indent), rows @ ..] => (*indent, rows),
                    _ => return Err(invalid("expected an indent width first")),
                };
                let align = match u32::try_from(indent) {
                    Ok(0) => StackAlign::Flush,
                    Ok(indent) => StackAlign::Indent(indent),
                    Err(_) => return Err(invalid("indent width must be a non-negative integer")),
                };
                Self::stack(align, children(rows)?)
            }
            "loop" => {
                let (forward, backward) = pair(args)?;
                Self::Loop { forward, backward }
            }
            "toploop" => {
                let (forward, backward) = pair(args)?;
                Self::TopLoop { forward, backward }
            }
            "optloop" => {
                let (forward, backward) = pair(args)?;
                Self::OptionalLoop { forward, backward }
            }
            "or" | "choice" | "tailbranch" => Self::Alternation(children(args)?),
            "opt" => Self::optional(BypassSide::Top, children(args)?),
            "optx" => Self::optional(BypassSide::Bottom, children(args)?),
            other => return Err(SpecError::InvalidSpecTag(other.to_string())),
        };
        Ok(spec)
    }
}

impl TryFrom<&Literal> for DiagramSpec {
    type Error = SpecError;

    fn try_from(literal: &Literal) -> Result<Self, Self::Error> {
        match literal {
            Literal::Null => Ok(Self::skip()),
            Literal::Str(text) if text == BULLET => Ok(Self::bullet()),
            Literal::Str(text) => Ok(Self::text(text.clone())),
            Literal::Int(value) => Err(SpecError::InvalidArguments {
                tag: "terminal".to_string(),
                reason: format!("integer {value} is not a diagram element"),
            }),
            Literal::List(items) => match items.as_slice() {
                [] => Ok(Self::skip()),
                [Literal::Str(tag), args @ ..] => Self::from_tagged(tag, args),
                [first, ..] => Err(SpecError::InvalidSpecTag(first.to_string())),
            },
        }
    }
}
