//! @ai:module:intent Text-generation service client for feedback narration
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextGenerator, GroqClient, MockGenerator
//! @ai:module:stateless false

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fixed persona handed to the service as the system instruction.
pub const SYSTEM_PERSONA: &str = "You are an expert math tutor generating student feedback.";

const COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// @ai:intent Narrow capability interface: prompt in, narrative text out
#[allow(async_fn_in_trait)]
pub trait TextGenerator: Send + Sync {
    /// @ai:intent Produce narrative text for the given prompt
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

/// @ai:intent Chat-completions request body
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// @ai:intent Chat-completions response body
#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// @ai:intent Groq chat-completions client
pub struct GroqClient {
    client: reqwest::Client,
    config: ApiConfig,
    api_key: String,
}

impl GroqClient {
    /// @ai:intent Create a new client
    /// @ai:pre GROQ_API_KEY environment variable is set
    /// @ai:effects env
    pub fn new(config: ApiConfig) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| Error::Config("GROQ_API_KEY not set in environment".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

impl TextGenerator for GroqClient {
    /// @ai:intent Request feedback text from the service
    ///
    /// Any transport failure, non-success status or empty response surfaces
    /// as `GenerationFailed`; the response is otherwise treated as opaque
    /// untrusted text.
    /// @ai:effects network
    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let request = ApiRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::GenerationFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GenerationFailed(format!(
                "service error ({status}): {body}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::GenerationFailed(format!("unparseable response: {e}")))?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(Error::GenerationFailed(
                "service returned empty feedback text".to_string(),
            ));
        }

        Ok(content)
    }
}

/// @ai:intent Mock generator for tests and dry runs
pub struct MockGenerator {
    response: String,
}

impl MockGenerator {
    /// @ai:intent Create a mock returning a fixed narrative
    /// @ai:effects pure
    pub fn new(response: String) -> Self {
        Self { response }
    }
}

impl TextGenerator for MockGenerator {
    /// @ai:intent Return the fixed narrative
    /// @ai:effects pure
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
        if self.response.trim().is_empty() {
            return Err(Error::GenerationFailed(
                "service returned empty feedback text".to_string(),
            ));
        }
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_returns_fixed_text() {
        let generator = MockGenerator::new("**Intro**\nKeep practicing!".to_string());
        let text = generator.generate(SYSTEM_PERSONA, "prompt").await.unwrap();
        assert!(text.contains("Keep practicing!"));
    }

    #[tokio::test]
    async fn test_mock_generator_empty_text_fails() {
        let generator = MockGenerator::new("   \n".to_string());
        let err = generator.generate(SYSTEM_PERSONA, "prompt").await.unwrap_err();
        assert!(matches!(err, Error::GenerationFailed(_)));
    }
}
