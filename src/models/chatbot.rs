//! Natural-language assistant payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotQuery {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatbotResponse {
    pub answer: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub confidence: Option<f64>,
}
