//! Agents
//!
//! An agent runs a symbolic program against one incoming message and returns
//! the program's [`Response`]. Each call goes through the same steps:
//!
//! ```text
//! message → fresh ExecutionContext → prelude → ContextPreparer
//!         → Evaluator::run → ResultUnwrapper → [PostProcessor] → Response
//! ```
//!
//! [`symbolic::SymbolicAgent`] keeps no state between calls.
//! [`dialog::DialogAgent`] additionally owns a
//! [`DialogHistory`](crate::history::DialogHistory): the history is bound
//! into the context before the run, the input message is appended to it, and
//! the produced result is appended as an `assistant` entry afterwards.

pub mod builder;
pub mod dialog;
pub mod symbolic;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    error::AgentResult,
    eval::evaluator::{Evaluator, Program},
    history::Role,
    provider::capability::Capability,
    response::Response,
    term::Term,
};

/// Input of one agent call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    /// Already parsed term, used as is.
    Term(Term),
    /// Text parsed by the evaluator.
    Text(String),
    /// Role/content pair, converted to `(role "content")`.
    Utterance { role: Role, content: String },
}

impl Message {
    pub fn utterance(role: Role, content: impl Into<String>) -> Self {
        Message::Utterance {
            role,
            content: content.into(),
        }
    }

    pub(crate) async fn resolve(self, evaluator: &dyn Evaluator) -> AgentResult<Term> {
        match self {
            Message::Term(term) => Ok(term),
            Message::Text(text) => Ok(evaluator.parse_single(&text).await?),
            Message::Utterance { role, content } => {
                Ok(Term::tagged(role.to_string(), Term::string(content)))
            }
        }
    }
}

impl From<Term> for Message {
    fn from(term: Term) -> Self {
        Message::Term(term)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

/// Where an agent's program comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramSource {
    File(PathBuf),
    Inline(Program),
    /// The file runs first into the same context; its results are validated
    /// and discarded. The inline program's results form the response.
    Composed { file: PathBuf, inline: Program },
}

impl ProgramSource {
    pub fn from_parts(path: Option<PathBuf>, code: Option<Program>) -> Result<Self, ConfigError> {
        match (path, code) {
            (Some(file), Some(inline)) => Ok(ProgramSource::Composed { file, inline }),
            (Some(file), None) => Ok(ProgramSource::File(file)),
            (None, Some(inline)) => Ok(ProgramSource::Inline(inline)),
            (None, None) => Err(ConfigError::MissingProgram),
        }
    }
}

#[async_trait]
pub trait Agent: Send {
    async fn invoke(
        &mut self,
        message: Message,
        capabilities: &[Capability],
    ) -> AgentResult<Response>;
}
