//! Receipt extraction through an Ollama-compatible chat endpoint.
//!
//! The API key only lives on the server: clients upload the image and never
//! see the credentials used to reach the model.

use async_trait::async_trait;
use base64::Engine as _;
use engine::{EngineError, ExtractedItem, Money, ReceiptExtractor, strip_data_url};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const INSTRUCTION: &str = "You are a professional receipt analysis expert. \
Your task is to extract items and their total amounts from receipt images. \
Ignore taxes and discounts if they are already factored into the item price, \
otherwise list them as separate items. \
Return only a JSON object containing an array of items with 'name' and 'amount' fields. \
The 'amount' should be a number. \
Example response format: {\"items\": [{\"name\": \"Burger\", \"amount\": 150}, {\"name\": \"Coke\", \"amount\": 35}]}";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ollama.com".to_string(),
            model: "gemini-3-flash-preview:latest".to_string(),
            api_key: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OllamaExtractor {
    client: Client,
    config: OllamaConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
    images: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReceiptPayload {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    name: String,
    #[serde(default)]
    amount: Value,
}

impl OllamaExtractor {
    pub fn new(client: Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }

    fn url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReceiptExtractor for OllamaExtractor {
    async fn extract(&self, image_base64: &str) -> Result<Vec<ExtractedItem>, EngineError> {
        let image = strip_data_url(image_base64.trim());
        base64::engine::general_purpose::STANDARD
            .decode(image)
            .map_err(|_| EngineError::Extraction("image is not valid base64".to_string()))?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: format!("{INSTRUCTION}\n\nPlease analyze this receipt."),
                images: [image],
            }],
            stream: false,
            format: "json",
        };

        let mut req = self.client.post(self.url()).json(&body);
        if let Some(key) = self.config.api_key.as_deref().filter(|key| !key.is_empty()) {
            req = req.bearer_auth(key);
        }

        tracing::debug!("sending receipt to {} ({})", self.url(), self.config.model);
        let resp = req
            .send()
            .await
            .map_err(|err| EngineError::Extraction(format!("network error: {err}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(EngineError::Extraction(format!(
                "HTTP error! status: {}, message: {text}",
                status.as_u16()
            )));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|err| EngineError::Extraction(format!("unexpected response: {err}")))?;
        let content = chat.message.and_then(|message| message.content);
        parse_content(content.as_deref())
    }
}

/// Decodes the model answer, tolerating markdown code fences around the JSON.
fn parse_content(content: Option<&str>) -> Result<Vec<ExtractedItem>, EngineError> {
    let cleaned = content
        .unwrap_or_default()
        .replace("```json", "")
        .replace("```", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(Vec::new());
    }

    let payload: ReceiptPayload = serde_json::from_str(cleaned)
        .map_err(|err| EngineError::Extraction(format!("model returned invalid JSON: {err}")))?;

    let items = payload
        .items
        .into_iter()
        .filter_map(|raw| match amount_value(&raw.amount) {
            Some(amount) => Some(ExtractedItem {
                name: raw.name,
                amount,
            }),
            None => {
                tracing::warn!("skipping '{}': unreadable amount {}", raw.name, raw.amount);
                None
            }
        })
        .collect();
    Ok(items)
}

/// Models sometimes quote amounts (`"1,200"`, `"$35"`, `"12.50"`).
fn amount_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => match text.parse::<Money>() {
            Ok(money) => Some(i64::from(money) as f64),
            Err(_) => text.trim().trim_start_matches('$').trim().parse().ok(),
        },
        _ => None,
    }
}
