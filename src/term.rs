use core::fmt;

use serde::{Deserialize, Serialize};

/// Grounded value carried inside a [`Term`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
        }
    }
}

/// A symbolic term exchanged with the evaluator.
///
/// Terms are either atomic (symbols, variables, grounded literals) or
/// expressions holding an ordered list of children. A *tagged record* is an
/// expression whose first child is a symbol naming its kind.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Term {
    Symbol(String),
    Variable(String),
    Literal(Literal),
    Expression(Vec<Term>),
}

impl Term {
    pub fn symbol(name: impl Into<String>) -> Self {
        Term::Symbol(name.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Term::Literal(Literal::String(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        Term::Literal(Literal::Integer(value))
    }

    pub fn expr(children: impl IntoIterator<Item = Term>) -> Self {
        Term::Expression(children.into_iter().collect())
    }

    /// Builds `(tag value)`.
    pub fn tagged(tag: impl Into<String>, value: Term) -> Self {
        Term::Expression(vec![Term::symbol(tag), value])
    }

    /// Builds the equality fact `(= (name) value)` used to bind a value in a space.
    pub fn definition(name: impl Into<String>, value: Term) -> Self {
        Term::Expression(vec![
            Term::symbol("="),
            Term::Expression(vec![Term::symbol(name)]),
            value,
        ])
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Term::Expression(_))
    }

    /// Children of an expression, `None` for atomic terms.
    pub fn children(&self) -> Option<&[Term]> {
        match self {
            Term::Expression(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Term::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Head symbol of an expression, if it has one.
    pub fn head(&self) -> Option<&str> {
        self.children()
            .and_then(|children| children.first())
            .and_then(Term::as_symbol)
    }

    /// Text form without string quoting, for use in prompts and lookups.
    pub fn to_plain_string(&self) -> String {
        match self {
            Term::Literal(Literal::String(s)) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Splits a two-element tagged record into `(tag, value)`.
    pub fn as_tagged(&self) -> Option<(&str, &Term)> {
        match self.children() {
            Some([Term::Symbol(tag), value]) => Some((tag.as_str(), value)),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Symbol(name) => write!(f, "{}", name),
            Term::Variable(name) => write!(f, "${}", name),
            Term::Literal(lit) => write!(f, "{}", lit),
            Term::Expression(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::string(value)
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::string(value)
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::integer(value)
    }
}
