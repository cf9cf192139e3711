use std::sync::Arc;

use crate::config::OllamaConfig;
use crate::error::{RelayError, RelayResult};
use crate::models::GenerateRequest;
use crate::transport::Transport;

/// Reply used whenever the model can't be reached or answers badly.
pub const FALLBACK_REPLY: &str = "🤖 I'm currently unavailable, but you can use the car recommendation feature to find amazing cars that match your preferences!";

/// Forwards single chat messages to the model. Stateless: nothing from
/// earlier messages is sent along.
pub struct ChatRelay {
    tx: Arc<dyn Transport>,
    model: String,
    prompt_template: String,
}

impl ChatRelay {
    pub fn new(tx: Arc<dyn Transport>, cfg: &OllamaConfig) -> Self {
        Self {
            tx,
            model: cfg.model.clone(),
            prompt_template: cfg.prompt_template.clone(),
        }
    }

    pub fn build_prompt(&self, message: &str) -> String {
        self.prompt_template.replace("{message}", message)
    }

    /// One model round trip. Empty text is a valid answer.
    pub async fn ask(&self, message: &str) -> RelayResult<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: self.build_prompt(message),
            stream: false,
        };

        let response = self.tx.generate(&request).await?;
        Ok(response.response.trim().to_string())
    }

    /// Like `ask`, but failures become `FALLBACK_REPLY`.
    pub async fn reply(&self, message: &str) -> String {
        match self.ask(message).await {
            Ok(text) => text,
            Err(e) => {
                log_relay_failure(&e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}

fn log_relay_failure(e: &RelayError) {
    match e {
        RelayError::Status { status, body } => {
            tracing::error!(status, body = %body, "Ollama returned an error status");
        }
        other => tracing::error!(error = %other, "Chat relay failed"),
    }
}
