//! Syntax tree produced by the [`parser`](super::parser).

use switchyard_core::spec::Literal;

use crate::span::{Span, Spanned};

/// A value of the structured-literal language.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Int(i64),
    /// `[a, b]` or `(a, b)`
    List(Vec<Spanned<Value>>),
    /// `name(a, b)`, shorthand for `['name', a, b]`
    Call {
        name: Spanned<String>,
        args: Vec<Spanned<Value>>,
    },
}

impl Value {
    /// The tag of a tagged node, with its span.
    ///
    /// Calls are tagged by their name; lists by their first element when it
    /// is a string.
    pub fn tag(&self) -> Option<(&str, Span)> {
        match self {
            Value::Call { name, .. } => Some((name.inner(), name.span())),
            Value::List(items) => match items.first().map(|item| (item.inner(), item.span())) {
                Some((Value::Str(tag), span)) => Some((tag, span)),
                _ => None,
            },
            _ => None,
        }
    }

    /// The arguments of a tagged node, excluding the tag itself.
    pub fn args(&self) -> &[Spanned<Value>] {
        match self {
            Value::Call { args, .. } => args,
            Value::List(items) if self.tag().is_some() => &items[1..],
            Value::List(items) => items,
            _ => &[],
        }
    }

    pub fn to_literal(&self) -> Literal {
        match self {
            Value::Null => Literal::Null,
            Value::Str(text) => Literal::Str(text.clone()),
            Value::Int(n) => Literal::Int(*n),
            Value::List(items) => {
                Literal::List(items.iter().map(|item| item.inner().to_literal()).collect())
            }
            Value::Call { name, args } => {
                Literal::tagged(name.inner(), args.iter().map(|arg| arg.inner().to_literal()))
            }
        }
    }
}

/// A hyperlink entry of the `url_map` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub text: Spanned<String>,
    pub target: Spanned<String>,
}

/// A complete description file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub diagram: Spanned<Value>,
    pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanned(value: Value) -> Spanned<Value> {
        Spanned::new(value, Span::default())
    }

    #[test]
    fn test_call_and_list_share_tag_and_literal() {
        let call = Value::Call {
            name: Spanned::new("opt".to_string(), Span::new(0..3)),
            args: vec![spanned(Value::Str("x".to_string()))],
        };
        let list = Value::List(vec![
            Spanned::new(Value::Str("opt".to_string()), Span::new(1..6)),
            spanned(Value::Str("x".to_string())),
        ]);

        assert_eq!(call.tag().map(|(tag, _)| tag), Some("opt"));
        assert_eq!(list.tag(), Some(("opt", Span::new(1..6))));
        assert_eq!(call.args().len(), 1);
        assert_eq!(list.args().len(), 1);
        assert_eq!(call.to_literal(), list.to_literal());
    }

    #[test]
    fn test_untagged_list() {
        let list = Value::List(vec![spanned(Value::Null), spanned(Value::Int(3))]);
        assert!(list.tag().is_none());
        assert_eq!(list.args().len(), 2);
        assert_eq!(
            list.to_literal(),
            Literal::List(vec![Literal::Null, Literal::Int(3)])
        );
    }
}
