use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequest, FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::debug;

use super::{
    capability::Capability,
    llm::{ChatMessage, LLMResponse, LanguageModel, ResponseMetadata},
    secret::ProviderSecret,
    types::{ProviderError, ProviderResult},
};
use crate::{config::CommonConfig, history::Role};

/// Chat completion model backed by the OpenAI API.
pub struct OpenAIChatModel {
    client: Option<Client<OpenAIConfig>>,
    name: String,
}

impl OpenAIChatModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            client: None,
            name: name.into(),
        }
    }

    pub fn with_secret(name: impl Into<String>, secret: &ProviderSecret) -> Self {
        let mut model = Self::new(name);
        model.initialize(secret);
        model
    }

    pub fn initialize(&mut self, secret: &ProviderSecret) {
        let mut openai_config =
            OpenAIConfig::new().with_api_key(secret.api_key.expose_secret());

        if let Some(org_id) = secret.additional_auth.get("organization_id") {
            openai_config = openai_config.with_org_id(org_id.expose_secret());
        }

        self.client = Some(Client::with_config(openai_config));
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    fn request_message(message: &ChatMessage) -> ProviderResult<ChatCompletionRequestMessage> {
        let content = message.content.as_str();
        let built = match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()
                .map(Into::into),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map(Into::into),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()
                .map(Into::into),
        };
        built.map_err(|e| ProviderError::InvalidRequest(e.to_string()))
    }

    fn tool(capability: &Capability) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: capability.name.clone(),
                description: capability.description.clone(),
                parameters: capability.parameters.clone(),
                strict: None,
            },
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAIChatModel {
    #[tracing::instrument(skip(self, messages, config, capabilities), fields(model = %config.model))]
    async fn complete(
        &self,
        messages: &[ChatMessage],
        config: &CommonConfig,
        capabilities: &[Capability],
    ) -> ProviderResult<LLMResponse> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ProviderError::Authentication("Client not initialized".into()))?;

        let messages = messages
            .iter()
            .map(Self::request_message)
            .collect::<ProviderResult<Vec<_>>>()?;
        let tools: Vec<ChatCompletionTool> = capabilities.iter().map(Self::tool).collect();
        debug!(messages = messages.len(), tools = tools.len(), "chat request");

        let request = CreateChatCompletionRequest {
            model: config.model.clone(),
            messages,
            temperature: Some(config.temperature),
            max_completion_tokens: Some(config.max_tokens as u32),
            tools: (!tools.is_empty()).then_some(tools),
            ..Default::default()
        };

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| ProviderError::ApiError(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::ApiError("No response content".into()))?;

        Ok(LLMResponse {
            content,
            metadata: ResponseMetadata {
                model: config.model.clone(),
                created_at: Utc::now(),
                token_usage: response
                    .usage
                    .map(|u| (u.prompt_tokens as usize, u.completion_tokens as usize)),
                finish_reason: response
                    .choices
                    .first()
                    .and_then(|c| c.finish_reason.as_ref().map(|r| format!("{:?}", r))),
            },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
