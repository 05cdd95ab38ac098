//! # symagent: symbolic agents behind a conversational interface
//!
//! `symagent` runs a symbolic program against an incoming message, extracts
//! the program's structured answer and, optionally, turns it into prose with
//! a domain lookup and a language model. Dialog agents also keep the running
//! conversation and expose it to the program on every turn.
//!
//! The symbolic runtime is not part of this crate. It is reached through the
//! [`eval::evaluator::Evaluator`] trait, which parses terms and evaluates
//! programs against an [`eval::context::ExecutionContext`].
//!
//! ## Pipeline
//!
//! ```text
//! message → ContextPreparer → Evaluator → ResultUnwrapper → [PostProcessor] → Response
//!                 ↑                                                  │
//!                 └──────────── DialogHistory (dialog agents) ◀──────┘
//! ```
//!
//! - [`eval::prepare`]: binds caller bindings, the message (`messages`) and
//!   the history (`history`) into a fresh context.
//! - [`response`]: validates `(Response value)` terms and flattens them into
//!   the payload list of a [`response::Response`].
//! - [`history`]: append-only utterance log with a pluggable window.
//! - [`agent`]: [`agent::symbolic::SymbolicAgent`] and
//!   [`agent::dialog::DialogAgent`], built with [`agent::builder::AgentBuilder`].
//! - [`enrich`] and [`provider`]: optional post-processing through a domain
//!   lookup and a language model.
//!
//! ## Example
//!
//! ```ignore
//! let agent = AgentBuilder::new(evaluator)
//!     .code("!(Response (greet (messages)))")
//!     .build()?;
//! let response = agent.invoke("(user hello)", &[]).await?;
//! ```

pub mod agent;
pub mod config;
pub mod enrich;
pub mod error;
pub mod eval;
pub mod history;
pub mod provider;
pub mod response;
pub mod term;

// Re-exports
pub use agent::{builder::AgentBuilder, dialog::DialogAgent, symbolic::SymbolicAgent, Agent, Message};
pub use error::*;
pub use response::Response;
pub use term::{Literal, Term};
