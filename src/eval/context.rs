use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::evaluator::EvalResult;
use crate::term::Term;

/// Name under which the current message is bound.
pub const MESSAGES_NAME: &str = "messages";
/// Name under which the dialog history is bound.
pub const HISTORY_NAME: &str = "history";

pub const RESERVED_NAMES: [&str; 2] = [MESSAGES_NAME, HISTORY_NAME];

/// Host function callable from a symbolic program.
pub trait Operation: Send + Sync {
    fn call(&self, args: &[Term]) -> EvalResult<Vec<Term>>;
}

impl<F> Operation for F
where
    F: Fn(&[Term]) -> EvalResult<Vec<Term>> + Send + Sync,
{
    fn call(&self, args: &[Term]) -> EvalResult<Vec<Term>> {
        self(args)
    }
}

/// Externally provided value or function registered before evaluation.
#[derive(Clone)]
pub enum Binding {
    Value(Term),
    Operation(Arc<dyn Operation>),
}

impl Binding {
    pub fn operation<O: Operation + 'static>(op: O) -> Self {
        Binding::Operation(Arc::new(op))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(term) => write!(f, "Value({})", term),
            Binding::Operation(_) => write!(f, "Operation(..)"),
        }
    }
}

impl From<Term> for Binding {
    fn from(term: Term) -> Self {
        Binding::Value(term)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ContextError {
    #[error("Binding already registered: {0}")]
    DuplicateBinding(String),
    #[error("Binding name is reserved: {0}")]
    ReservedName(String),
}

pub type ContextResult<T> = Result<T, ContextError>;

/// Namespace a single program run is evaluated against.
///
/// A context is built for one invocation and dropped afterwards; it is never
/// shared between calls.
pub struct ExecutionContext {
    trace_id: Uuid,
    bindings: HashMap<String, Binding>,
    facts: Vec<Term>,
    defined: Vec<String>,
    include_paths: Vec<PathBuf>,
}

impl ExecutionContext {
    pub fn new(include_paths: Vec<PathBuf>) -> Self {
        let trace_id = Uuid::new_v4();
        debug!(%trace_id, "execution context created");
        Self {
            trace_id,
            bindings: HashMap::new(),
            facts: Vec::new(),
            defined: Vec::new(),
            include_paths,
        }
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Registers a caller binding. Reserved names and names already bound
    /// (as a binding or a definition) are rejected.
    pub fn register(&mut self, name: &str, binding: Binding) -> ContextResult<()> {
        if RESERVED_NAMES.contains(&name) {
            return Err(ContextError::ReservedName(name.to_string()));
        }
        if self.is_bound(name) {
            return Err(ContextError::DuplicateBinding(name.to_string()));
        }
        self.bindings.insert(name.to_string(), binding);
        Ok(())
    }

    /// Adds `(= (name) value)` to the space.
    pub fn define(&mut self, name: &str, value: Term) -> ContextResult<()> {
        if self.is_bound(name) {
            return Err(ContextError::DuplicateBinding(name.to_string()));
        }
        self.facts.push(Term::definition(name, value));
        self.defined.push(name.to_string());
        Ok(())
    }

    /// Adds an arbitrary fact to the space.
    pub fn add_fact(&mut self, fact: Term) {
        self.facts.push(fact);
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name) || self.defined.iter().any(|d| d == name)
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Value of a `(= (name) value)` fact.
    pub fn resolve(&self, name: &str) -> Option<&Term> {
        self.facts.iter().find_map(|fact| match fact.children() {
            Some([Term::Symbol(eq), Term::Expression(lhs), value]) if eq == "=" => {
                match lhs.as_slice() {
                    [Term::Symbol(n)] if n == name => Some(value),
                    _ => None,
                }
            }
            _ => None,
        })
    }

    pub fn facts(&self) -> &[Term] {
        &self.facts
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("trace_id", &self.trace_id)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("facts", &self.facts.len())
            .field("include_paths", &self.include_paths)
            .finish()
    }
}
