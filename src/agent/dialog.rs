use async_trait::async_trait;
use tracing::debug;

use super::{symbolic::SymbolicAgent, Agent, Message};
use crate::{
    error::AgentResult,
    eval::prepare::ContextPreparer,
    history::{DialogHistory, Role},
    provider::capability::Capability,
    response::Response,
};

/// Agent keeping a running conversation.
///
/// Each turn binds the history as it stood before the turn, appends the input
/// message, runs the program, then appends the returned result as an
/// `assistant` entry. A failed turn keeps its input entry and gets no result
/// entry.
///
/// Turns take `&mut self`; a shared agent has to be serialized by its owner.
pub struct DialogAgent {
    agent: SymbolicAgent,
    history: DialogHistory,
}

impl DialogAgent {
    pub fn new(agent: SymbolicAgent, history: DialogHistory) -> Self {
        Self { agent, history }
    }

    pub fn agent(&self) -> &SymbolicAgent {
        &self.agent
    }

    pub fn history(&self) -> &DialogHistory {
        &self.history
    }

    #[tracing::instrument(skip_all, fields(turn = self.history.len() / 2))]
    pub async fn invoke(
        &mut self,
        message: impl Into<Message>,
        capabilities: &[Capability],
    ) -> AgentResult<Response> {
        let message = self.agent.resolve_message(message.into()).await?;
        let mut context = self.agent.new_context().await?;
        ContextPreparer::new(self.agent.bindings()).prepare_dialog(
            &mut context,
            &message,
            &mut self.history,
        )?;

        let response = self.agent.evaluate(&mut context).await?;
        let response = self
            .agent
            .post_process(&message, response, capabilities)
            .await?;

        self.history
            .append_utterance(Role::Assistant, response.to_term());
        debug!(entries = self.history.len(), "turn recorded");
        Ok(response)
    }
}

#[async_trait]
impl Agent for DialogAgent {
    async fn invoke(
        &mut self,
        message: Message,
        capabilities: &[Capability],
    ) -> AgentResult<Response> {
        DialogAgent::invoke(self, message, capabilities).await
    }
}
