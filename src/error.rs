use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::enrich::EnrichmentError;
use crate::eval::context::ContextError;
use crate::eval::evaluator::EvalError;
use crate::response::MalformedResultError;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Malformed result: {0}")]
    MalformedResult(#[from] MalformedResultError),
    #[error("Eval error: {0}")]
    Evaluation(#[from] EvalError),
    #[error("Failed to read program {path}: {source}")]
    ProgramLoad {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),
}

impl From<ContextError> for AgentError {
    fn from(error: ContextError) -> Self {
        AgentError::Configuration(ConfigError::Binding(error))
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
