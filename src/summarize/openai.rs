//! [`SummaryModel`] backed by the OpenAI chat completions API.

use super::{ChatTurn, Role, SummaryModel};
use crate::error::{Result, YoyakuError};
use crate::openai::{create_client, require_api_key};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::debug;

pub struct OpenAIModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIModel {
    pub fn new(model: &str) -> Result<Self> {
        require_api_key()?;
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, messages: Vec<ChatCompletionRequestMessage>, format: Option<ResponseFormat>) -> Result<String> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);
        if let Some(format) = format {
            args.response_format(format);
        }
        let request = args.build().map_err(|e| YoyakuError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| YoyakuError::OpenAI(format!("Chat completion failed: {}", e)))?;

        if let Some(usage) = &response.usage {
            debug!(
                "Tokens: {} prompt, {} completion",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| YoyakuError::Summary("Empty response from model".to_string()))
    }
}

fn to_message(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage> {
    let message = match turn.role {
        Role::User => ChatCompletionRequestUserMessageArgs::default()
            .content(turn.content.clone())
            .build()
            .map_err(|e| YoyakuError::OpenAI(e.to_string()))?
            .into(),
        Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(turn.content.clone())
            .build()
            .map_err(|e| YoyakuError::OpenAI(e.to_string()))?
            .into(),
    };
    Ok(message)
}

#[async_trait]
impl SummaryModel for OpenAIModel {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        let messages = messages.iter().map(to_message).collect::<Result<Vec<_>>>()?;
        self.send(messages, None).await
    }

    async fn complete_structured(&self, prompt: &str, schema: &serde_json::Value) -> Result<serde_json::Value> {
        let format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some("Timestamped video summary".to_string()),
                name: "video_summary".to_string(),
                schema: Some(schema.clone()),
                strict: Some(true),
            },
        };

        let content = self.send(vec![to_message(&ChatTurn::user(prompt))?], Some(format)).await?;
        serde_json::from_str(&content).map_err(|e| YoyakuError::Summary(format!("Invalid JSON: {}", e)))
    }
}
