use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{Agent, Message, ProgramSource};
use crate::{
    enrich::PostProcessor,
    error::{AgentError, AgentResult},
    eval::{
        context::ExecutionContext,
        evaluator::{Evaluator, Program},
        prepare::{Bindings, ContextPreparer},
    },
    provider::capability::Capability,
    response::{Response, ResultUnwrapper},
    term::Term,
};

/// Stateless agent: every call runs the configured program in a fresh context.
pub struct SymbolicAgent {
    pub(super) source: ProgramSource,
    pub(super) prelude: Option<Program>,
    pub(super) bindings: Bindings,
    pub(super) include_paths: Vec<PathBuf>,
    pub(super) unwrapper: ResultUnwrapper,
    pub(super) evaluator: Arc<dyn Evaluator>,
    pub(super) post_processor: Option<Arc<dyn PostProcessor>>,
}

impl SymbolicAgent {
    pub fn source(&self) -> &ProgramSource {
        &self.source
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    #[tracing::instrument(skip_all)]
    pub async fn invoke(
        &self,
        message: impl Into<Message>,
        capabilities: &[Capability],
    ) -> AgentResult<Response> {
        let message = self.resolve_message(message.into()).await?;
        let mut context = self.new_context().await?;
        ContextPreparer::new(&self.bindings).prepare(&mut context, &message)?;
        let response = self.evaluate(&mut context).await?;
        self.post_process(&message, response, capabilities).await
    }

    pub(super) async fn resolve_message(&self, message: Message) -> AgentResult<Term> {
        message.resolve(self.evaluator.as_ref()).await
    }

    /// Builds the context for one call and runs the prelude into it.
    pub(super) async fn new_context(&self) -> AgentResult<ExecutionContext> {
        let mut context = ExecutionContext::new(self.include_paths.clone());
        if let Some(prelude) = &self.prelude {
            let discarded = self.evaluator.run(&mut context, prelude).await?;
            debug!(groups = discarded.len(), "prelude loaded");
        }
        Ok(context)
    }

    pub(super) async fn evaluate(&self, context: &mut ExecutionContext) -> AgentResult<Response> {
        let raw = match &self.source {
            ProgramSource::File(path) => {
                let program = load_program(path).await?;
                self.evaluator.run(context, &program).await?
            }
            ProgramSource::Inline(program) => self.evaluator.run(context, program).await?,
            ProgramSource::Composed { file, inline } => {
                let program = load_program(file).await?;
                let setup = self.evaluator.run(context, &program).await?;
                let discarded = self.unwrapper.unwrap(setup)?;
                debug!(
                    discarded = discarded.len(),
                    "file results superseded by inline program"
                );
                self.evaluator.run(context, inline).await?
            }
        };
        let response = self.unwrapper.to_response(raw)?;
        info!(
            trace_id = %context.trace_id(),
            payloads = response.content.len(),
            "program evaluated"
        );
        Ok(response)
    }

    pub(super) async fn post_process(
        &self,
        message: &Term,
        response: Response,
        capabilities: &[Capability],
    ) -> AgentResult<Response> {
        match &self.post_processor {
            Some(processor) => Ok(processor.process(message, response, capabilities).await?),
            None => Ok(response),
        }
    }
}

async fn load_program(path: &Path) -> AgentResult<Program> {
    debug!(path = %path.display(), "loading program");
    tokio::fs::read_to_string(path)
        .await
        .map(Program::Text)
        .map_err(|source| AgentError::ProgramLoad {
            path: path.to_path_buf(),
            source,
        })
}

#[async_trait]
impl Agent for SymbolicAgent {
    async fn invoke(
        &mut self,
        message: Message,
        capabilities: &[Capability],
    ) -> AgentResult<Response> {
        SymbolicAgent::invoke(self, message, capabilities).await
    }
}
