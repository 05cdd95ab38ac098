use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::{Deserialize, Serialize};

use super::{capability::Capability, types::ProviderResult};
use crate::{config::CommonConfig, history::Role};

/// One role/content message sent to a language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[automock]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CommonConfig,
        capabilities: &[Capability],
    ) -> ProviderResult<LLMResponse>;

    fn name(&self) -> &str;
}

#[derive(Debug, Default, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub token_usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

impl Default for ResponseMetadata {
    fn default() -> Self {
        Self {
            model: String::new(),
            created_at: Utc::now(),
            token_usage: None,
            finish_reason: None,
        }
    }
}

/// (prompt tokens, completion tokens)
pub type TokenUsage = (usize, usize);
