use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use super::{
    capability::Capability,
    llm::{ChatMessage, LLMResponse, LanguageModel, ResponseMetadata},
    types::{ProviderError, ProviderResult},
};
use crate::config::CommonConfig;

type Pattern = String;

type Answer = String;

pub type KnowledgeBase = DashMap<Pattern, Answer>;

/// Offline model answering from a pattern table.
///
/// Answers with the longest pattern contained in the last message.
pub struct KeywordModel {
    name: String,
    knowledge_base: Arc<KnowledgeBase>,
}

impl KeywordModel {
    pub fn new(name: impl Into<String>, knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self {
            name: name.into(),
            knowledge_base,
        }
    }

    pub fn from_pairs<I, P, A>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, A)>,
        P: Into<String>,
        A: Into<String>,
    {
        let knowledge_base = KnowledgeBase::new();
        for (pattern, answer) in pairs {
            knowledge_base.insert(pattern.into(), answer.into());
        }
        Self::new(name, Arc::new(knowledge_base))
    }
}

#[async_trait]
impl LanguageModel for KeywordModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _config: &CommonConfig,
        _capabilities: &[Capability],
    ) -> ProviderResult<LLMResponse> {
        let prompt = messages
            .last()
            .map(|m| m.content.as_str())
            .ok_or_else(|| ProviderError::InvalidRequest("No messages".into()))?;

        let mut responses: Vec<(String, String)> = self
            .knowledge_base
            .iter()
            .filter(|entry| prompt.contains(entry.key().as_str()))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        // DashMap iteration order is unspecified; longest pattern wins.
        responses.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        let (_, content) = responses
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError("No response found".to_string()))?;
        debug!("response: {:?}", content);
        Ok(LLMResponse {
            content,
            metadata: ResponseMetadata {
                model: self.name.clone(),
                created_at: Utc::now(),
                token_usage: None,
                finish_reason: None,
            },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
