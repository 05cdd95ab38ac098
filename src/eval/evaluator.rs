use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use super::context::ExecutionContext;
use crate::term::Term;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Evaluation failed: {0}")]
    Failed(String),
    #[error("Module not found: {0}")]
    ModuleNotFound(String),
    #[error("Operation {name} failed: {message}")]
    Operation { name: String, message: String },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// A program handed to the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    /// Program text; every top-level `!` step yields one result group.
    Text(String),
    /// A single expression interpreted directly against the space.
    Term(Term),
}

impl Program {
    pub fn text(source: impl Into<String>) -> Self {
        Program::Text(source.into())
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        Program::Text(source.to_string())
    }
}

impl From<String> for Program {
    fn from(source: String) -> Self {
        Program::Text(source)
    }
}

impl From<Term> for Program {
    fn from(term: Term) -> Self {
        Program::Term(term)
    }
}

/// Boundary to the symbolic runtime.
///
/// Implementations own parsing and evaluation of the symbolic language. The
/// agent only relies on the shape of what comes back: one group of terms per
/// evaluation step, in the order the steps ran. Interpreting a
/// [`Program::Term`] yields exactly one group.
#[automock]
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Parses a single term from text.
    async fn parse_single(&self, text: &str) -> EvalResult<Term>;

    /// Evaluates `program` against `context`, which the program may mutate.
    async fn run(
        &self,
        context: &mut ExecutionContext,
        program: &Program,
    ) -> EvalResult<Vec<Vec<Term>>>;
}
