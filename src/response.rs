//! Response extraction
//!
//! A program reports its answer by producing `(Response value)` terms. The
//! evaluator hands back every term each evaluation step produced, so the
//! [`ResultUnwrapper`] walks all groups in order and promotes the `value` of
//! each response-shaped term into the [`Response`] payload list.
//!
//! Shape rules, in order:
//!
//! 1. atomic terms are skipped;
//! 2. empty expressions `()` are skipped;
//! 3. an expression whose child count is not two is a [`MalformedResultError`];
//! 4. a two-child expression headed by the response tag contributes its second
//!    child verbatim;
//! 5. a two-child expression with any other head is rejected or skipped
//!    depending on the [`UnrecognizedPolicy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::term::Term;

pub const DEFAULT_RESPONSE_TAG: &str = "Response";

/// Ordered payloads produced by one agent call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub content: Vec<Term>,
    /// Trailing status or metadata slot.
    pub auxiliary: Option<Term>,
}

impl Response {
    pub fn new(content: Vec<Term>) -> Self {
        Self {
            content,
            auxiliary: None,
        }
    }

    pub fn with_auxiliary(mut self, auxiliary: Term) -> Self {
        self.auxiliary = Some(auxiliary);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Collapses the payloads into a single term: the payload itself when
    /// there is one, otherwise an expression of all of them (`()` when empty).
    pub fn to_term(&self) -> Term {
        match self.content.as_slice() {
            [single] => single.clone(),
            many => Term::Expression(many.to_vec()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedResultError {
    #[error("Unexpected response format: expected 2 children, found {count} in {term}")]
    ChildCount { count: usize, term: Term },
    #[error("Unexpected response format: expected tag {expected}, found {term}")]
    UnexpectedTag { expected: String, term: Term },
}

/// What to do with a two-child expression whose head is not the response tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedPolicy {
    #[default]
    Reject,
    Skip,
}

#[derive(Debug, Clone)]
pub struct ResultUnwrapper {
    tag: String,
    policy: UnrecognizedPolicy,
}

impl Default for ResultUnwrapper {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TAG, UnrecognizedPolicy::default())
    }
}

impl ResultUnwrapper {
    pub fn new(tag: impl Into<String>, policy: UnrecognizedPolicy) -> Self {
        Self {
            tag: tag.into(),
            policy,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn unwrap(&self, raw: Vec<Vec<Term>>) -> Result<Vec<Term>, MalformedResultError> {
        let mut payloads = Vec::new();
        for term in raw.into_iter().flatten() {
            let Term::Expression(mut children) = term else {
                trace!("skipping atomic result");
                continue;
            };
            match children.len() {
                0 => continue,
                2 => {}
                count => {
                    return Err(MalformedResultError::ChildCount {
                        count,
                        term: Term::Expression(children),
                    })
                }
            }
            if children[0].as_symbol() != Some(self.tag.as_str()) {
                match self.policy {
                    UnrecognizedPolicy::Skip => {
                        trace!(head = %children[0], "skipping untagged result");
                        continue;
                    }
                    UnrecognizedPolicy::Reject => {
                        return Err(MalformedResultError::UnexpectedTag {
                            expected: self.tag.clone(),
                            term: Term::Expression(children),
                        })
                    }
                }
            }
            if let Some(value) = children.pop() {
                payloads.push(value);
            }
        }
        debug!(count = payloads.len(), "unwrapped results");
        Ok(payloads)
    }

    pub fn to_response(&self, raw: Vec<Vec<Term>>) -> Result<Response, MalformedResultError> {
        self.unwrap(raw).map(Response::new)
    }
}
