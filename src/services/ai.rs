//! Generative-AI structured-object client
//!
//! The AI service receives a chat transcript plus a JSON schema and answers
//! with an object that should match the schema. Nothing guarantees it does, so
//! callers read fields through [`string_field`] / [`string_list_field`] and
//! substitute their own fallbacks.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AiClient: Send + Sync {
    /// Generates an object for `schema`. Returns `Value::Null` when the service produced none.
    async fn generate_object(&self, messages: Vec<ChatMessage>, schema: Value) -> AppResult<Value>;
}

#[derive(Serialize)]
struct GenerateObjectRequest<'a> {
    messages: &'a [ChatMessage],
    schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateObjectResponse {
    #[serde(default)]
    object: Value,
}

/// [`AiClient`] posting to an HTTP structured-generation endpoint
#[derive(Clone)]
pub struct HttpAiClient {
    http_client: HttpClient,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl HttpAiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            api_url: config.ai_api_url.clone(),
            api_key: config.ai_api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl AiClient for HttpAiClient {
    async fn generate_object(&self, messages: Vec<ChatMessage>, schema: Value) -> AppResult<Value> {
        let url = self.api_url.as_deref().ok_or_else(|| {
            AppError::Configuration("AI service not configured. Set AI_API_URL".to_string())
        })?;

        let mut request = self.http_client.post(url).json(&GenerateObjectRequest {
            messages: &messages,
            schema: &schema,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AI service request failed");
            return Err(AppError::ExternalApi(format!(
                "AI service returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateObjectResponse = response.json().await?;
        if generated.object.is_null() {
            tracing::warn!("AI service returned no object");
        }

        Ok(generated.object)
    }
}

/// Non-empty string field of a generated object
pub fn string_field(object: &Value, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Non-empty array field of a generated object, with every element rendered as a string
pub fn string_list_field(object: &Value, key: &str) -> Option<Vec<String>> {
    let items = object.get(key)?.as_array()?;
    let list: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
