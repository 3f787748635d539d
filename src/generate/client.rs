use crate::config::GenerationConfig;
use crate::error::{DomainMeshError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request structure for the chat completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response structure from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat completions client that turns a relationship prompt into
/// `Entity A --Relationship--> Entity B` text.
///
/// Rate limits and server errors are retried with exponential backoff.
pub struct RelationshipGenerator {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: usize,
}

impl RelationshipGenerator {
    /// Create a new generator
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key sent as a bearer token
    /// * `config` - Model, endpoint, retry and timeout settings
    pub fn new(api_key: String, config: &GenerationConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(DomainMeshError::Config(format!(
                "{} is set but empty",
                config.api_key_env
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainMeshError::Generation(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Send `prompt` and return the model's reply text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.complete(prompt).await {
                Ok(text) => {
                    log::debug!(
                        "Chat completion took {:?} (attempt {})",
                        start.elapsed(),
                        attempt + 1
                    );
                    return Ok(text);
                }
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    log::warn!("Retry {}/{} after error: {}", attempt + 1, self.max_retries, e);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Single API request, no retries
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainMeshError::Generation(format!("Network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainMeshError::Generation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(DomainMeshError::Generation(format!(
                "API error {}: {}",
                status.as_u16(),
                body
            )));
        }

        parse_completion(&body)
    }
}

/// Extract the first choice's message content from a chat completion body
pub fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| DomainMeshError::Generation(format!("Failed to parse response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| DomainMeshError::Generation("Empty response: no choices".to_string()))
}

/// 429 and 5xx responses are worth retrying
fn is_transient(err: &DomainMeshError) -> bool {
    let DomainMeshError::Generation(msg) = err else {
        return false;
    };
    ["API error 429", "API error 500", "API error 502", "API error 503", "API error 504"]
        .iter()
        .any(|code| msg.starts_with(code))
}
