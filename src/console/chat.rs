use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::warn;

use crate::api::ChatbotClient;
use crate::error::ClientError;
use crate::router::ViewScope;

/// Shown in place of an answer when the assistant could not be reached.
pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(author: Author, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
            timestamp: Local::now(),
        }
    }
}

/// Conversation with the inventory assistant.
pub struct ChatSession {
    client: ChatbotClient,
    scope: ViewScope,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(client: ChatbotClient, scope: ViewScope) -> Self {
        Self {
            client,
            scope,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Ask a question and return the reply appended to the transcript.
    ///
    /// Blank questions are ignored (`Ok(None)`). A failed query appends
    /// [`APOLOGY_MESSAGE`]; only cancellation is returned as an error.
    pub async fn ask(
        &mut self,
        question: &str,
        context: Option<Value>,
    ) -> Result<Option<&ChatMessage>, ClientError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }
        self.messages.push(ChatMessage::new(Author::User, question));

        let reply = match self.scope.run(self.client.query(question, context)).await {
            Ok(response) => response.answer,
            Err(ClientError::Cancelled) => return Err(ClientError::Cancelled),
            Err(e) => {
                warn!(error = %e, "Chatbot query failed");
                APOLOGY_MESSAGE.to_string()
            }
        };

        self.messages.push(ChatMessage::new(Author::Assistant, reply));
        Ok(self.messages.last())
    }
}
