//! Chat completion requests

use serde::{Deserialize, Serialize};

use super::Endpoint;
use crate::{Error, Result};

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Single-turn chat completion client
///
/// Each call sends exactly one user message; no earlier turns are included.
pub struct ChatCompletion {
    endpoint: Endpoint,
    model: String,
}

impl ChatCompletion {
    pub(super) const fn new(endpoint: Endpoint, model: String) -> Self {
        Self { endpoint, model }
    }

    /// Ask the model for a reply to `prompt`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response has no content
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "requesting completion");

        let response = self
            .endpoint
            .post("chat/completions")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat completion API error");
            return Err(Error::Completion(format!("OpenAI API error {status}: {body}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("failed to parse OpenAI response: {e}")))?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Completion("response contained no message".to_string()))?;

        let reply = reply.trim().to_string();
        tracing::info!(reply_chars = reply.len(), "completion received");
        Ok(reply)
    }
}
