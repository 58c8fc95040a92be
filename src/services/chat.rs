//! AI advisor conversation.

use crate::net::api::ExpenseApi;
use crate::net::error::ApiError;

pub const GREETING: &str =
    "Hello! I'm your AI financial advisor. Ask me anything about your expenses, budgeting, or financial planning.";
pub const APOLOGY: &str = "I'm sorry, I'm having trouble responding right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
    /// Chart image path returned alongside the answer, if any.
    pub chart_url: Option<String>,
}

impl ChatMessage {
    fn user(text: &str) -> Self {
        Self { speaker: Speaker::User, text: text.to_owned(), chart_url: None }
    }

    fn assistant(text: impl Into<String>, chart_url: Option<String>) -> Self {
        Self { speaker: Speaker::Assistant, text: text.into(), chart_url }
    }
}

/// Ordered chat history, seeded with the advisor greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self { messages: vec![ChatMessage::assistant(GREETING, None)] }
    }
}

impl ChatTranscript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `input` and append both sides of the exchange.
    ///
    /// Blank input is ignored and returns `Ok(None)`. On failure an apology
    /// is appended in place of the answer and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the API error from the chat endpoint.
    pub async fn send<A: ExpenseApi + ?Sized>(&mut self, api: &A, input: &str) -> Result<Option<&ChatMessage>, ApiError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        self.messages.push(ChatMessage::user(input));

        match api.chat(input).await {
            Ok(reply) => {
                tracing::debug!(has_chart = reply.chart_url.is_some(), "advisor replied");
                self.messages
                    .push(ChatMessage::assistant(reply.response, reply.chart_url));
                Ok(self.messages.last())
            }
            Err(e) => {
                tracing::warn!(error = %e, "advisor request failed");
                self.messages.push(ChatMessage::assistant(APOLOGY, None));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
