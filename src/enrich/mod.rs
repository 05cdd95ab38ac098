//! Post-processing of agent responses
//!
//! After a program's results are unwrapped, an agent may hand the
//! [`Response`] to a [`PostProcessor`]. The shipped processor,
//! [`formatter::DomainFormatter`], looks up the identifiers the program
//! returned in an external domain source and asks a language model to turn
//! the terse answer into prose.
//!
//! Post-processing is optional. Agents built without a processor return the
//! unwrapped response as is, so the extraction path never depends on a
//! network-backed collaborator.

pub mod formatter;
pub mod lookup;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    provider::{capability::Capability, types::ProviderError},
    response::Response,
    term::Term,
};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Domain lookup failed: {0}")]
    Lookup(String),
    #[error("Language model failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("Failed to build prompt: {0}")]
    Prompt(String),
}

pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

#[automock]
#[async_trait]
pub trait PostProcessor: Send + Sync {
    /// Rewrites `response`, produced for `message`.
    async fn process(
        &self,
        message: &Term,
        response: Response,
        capabilities: &[Capability],
    ) -> EnrichmentResult<Response>;
}
