use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::models::{ChatbotQuery, ChatbotResponse};
use crate::pipeline::{ApiRequest, Pipeline};

/// Natural-language questions about the inventory.
#[derive(Clone)]
pub struct ChatbotClient {
    pipeline: Pipeline,
}

impl ChatbotClient {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn query(
        &self,
        question: &str,
        context: Option<Value>,
    ) -> Result<ChatbotResponse, ClientError> {
        let body = ChatbotQuery {
            question: question.to_string(),
            context,
        };
        let request = ApiRequest::post("/chatbot/query").json(&body)?;
        let response: ChatbotResponse = self.pipeline.send_json(request).await?;
        debug!(confidence = ?response.confidence, "Chatbot answered");
        Ok(response)
    }
}
