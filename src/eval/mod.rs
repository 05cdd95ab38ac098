//! Evaluation boundary
//!
//! The symbolic runtime itself lives outside this crate. This module defines
//! what the agents need from it and how a run is set up:
//!
//! - [`context::ExecutionContext`]: the namespace a single run is evaluated
//!   against. One is built per invocation and never reused.
//! - [`evaluator::Evaluator`]: the runtime boundary (parse a term, run a
//!   program against a context).
//! - [`prepare::ContextPreparer`]: binds caller bindings, the current message
//!   and, for dialog agents, the history into a fresh context.

pub mod context;
pub mod evaluator;
pub mod prepare;
