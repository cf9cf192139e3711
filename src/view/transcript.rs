use super::ViewError;
use crate::models::{ChatMessage, Role};

/// Shown when the chat endpoint itself can't be reached.
pub const CLIENT_FALLBACK: &str = "Could not get a response from AI.";

/// Append-only chat log with a single pending slot.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the user's message and marks a reply as pending. Returns the
    /// text to send.
    pub fn begin(&mut self, input: &str) -> Result<String, ViewError> {
        if self.pending {
            return Err(ViewError::Busy);
        }
        if input.trim().is_empty() {
            return Err(ViewError::BlankMessage);
        }
        self.messages.push(ChatMessage {
            role: Role::User,
            content: input.to_string(),
        });
        self.pending = true;
        Ok(input.to_string())
    }

    /// Appends the assistant's reply and clears the pending flag.
    pub fn complete(&mut self, reply: impl Into<String>) -> Result<(), ViewError> {
        if !self.pending {
            return Err(ViewError::Idle);
        }
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: reply.into(),
        });
        self.pending = false;
        Ok(())
    }

    /// The request never produced a body.
    pub fn fail(&mut self) -> Result<(), ViewError> {
        self.complete(CLIENT_FALLBACK)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
