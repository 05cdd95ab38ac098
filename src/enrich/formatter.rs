use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{
    lookup::{DomainLookup, DomainRecord},
    EnrichmentError, EnrichmentResult, PostProcessor,
};
use crate::{
    config::{CommonConfig, EnrichmentSettings},
    provider::{
        capability::Capability,
        llm::{ChatMessage, LanguageModel},
    },
    response::Response,
    term::Term,
};

const DEFAULT_SYSTEM_PROMPT: &str = "You explain answers produced by a symbolic reasoning agent. \
Stay faithful to the answer and use the dataset only to add accurate detail.";

#[derive(Debug, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

/// Enriches a response with domain records and rewrites it as prose.
///
/// Payloads shaped `(lookup_tag id)` name the identifiers to look up. The
/// rewritten response carries the model's text as its only payload and the
/// original payloads, collapsed to one term, in the auxiliary slot.
pub struct DomainFormatter {
    lookup: Arc<dyn DomainLookup>,
    model: Arc<dyn LanguageModel>,
    settings: EnrichmentSettings,
    llm_config: CommonConfig,
}

impl DomainFormatter {
    pub fn new(
        lookup: Arc<dyn DomainLookup>,
        model: Arc<dyn LanguageModel>,
        settings: EnrichmentSettings,
        llm_config: CommonConfig,
    ) -> Self {
        Self {
            lookup,
            model,
            settings,
            llm_config,
        }
    }

    /// Identifiers of the payloads tagged with the lookup tag, in order.
    pub fn lookup_ids(&self, response: &Response) -> Vec<String> {
        response
            .content
            .iter()
            .filter_map(Term::as_tagged)
            .filter(|(tag, _)| *tag == self.settings.lookup_tag)
            .map(|(_, id)| id.to_plain_string())
            .collect()
    }

    pub fn build_prompt(
        &self,
        message: &Term,
        response: &Response,
        records: &[DomainRecord],
    ) -> EnrichmentResult<Prompt> {
        let dataset =
            serde_json::to_string(records).map_err(|e| EnrichmentError::Prompt(e.to_string()))?;
        let answer = response
            .content
            .iter()
            .map(Term::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        let system = self
            .settings
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        let user = format!(
            "Below are a user's question and the answer found for it. Using the question as \
             context, rewrite the answer so it is more descriptive. Take facts only from the \
             dataset.\n\n\
             User's question: {}\n\n\
             Dataset: {}\n\n\
             Answer: [{}]\n\n\
             Reply with the description.",
            message.to_plain_string(),
            dataset,
            answer
        );
        Ok(Prompt { system, user })
    }
}

#[async_trait]
impl PostProcessor for DomainFormatter {
    #[tracing::instrument(skip_all, fields(payloads = response.content.len()))]
    async fn process(
        &self,
        message: &Term,
        response: Response,
        capabilities: &[Capability],
    ) -> EnrichmentResult<Response> {
        let ids = self.lookup_ids(&response);
        let records = if ids.is_empty() {
            Vec::new()
        } else {
            self.lookup.lookup(&ids).await?
        };
        if records.len() < ids.len() {
            warn!(
                requested = ids.len(),
                found = records.len(),
                "some identifiers have no domain record"
            );
        }
        debug!(ids = ?ids, records = records.len(), "domain records");

        let prompt = self.build_prompt(message, &response, &records)?;
        let completion = self
            .model
            .complete(&prompt.into_messages(), &self.llm_config, capabilities)
            .await?;
        info!(model = self.model.name(), "response formatted");

        Ok(Response::new(vec![Term::string(completion.content)]).with_auxiliary(response.to_term()))
    }
}
