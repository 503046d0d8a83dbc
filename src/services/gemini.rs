// src/services/gemini.rs
use crate::errors::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Seam between the chat handler and the generative backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate_reply(&self, question: &str) -> Result<String, ApiError>;
}

pub struct GeminiService {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiService {
    pub fn new(api_key: String, model: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::ExternalService(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model,
            client,
        })
    }
}

#[async_trait]
impl ChatModel for GeminiService {
    async fn generate_reply(&self, question: &str) -> Result<String, ApiError> {
        let prompt = build_prompt(question);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }]
            }))
            .send()
            .await
            .map_err(|e| ApiError::ExternalService(format!("Gemini request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::ExternalService(format!(
                "Gemini error {status}: {error_text}"
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::ExternalService(format!("failed to parse Gemini response: {e}")))?;

        extract_reply(&result)
            .ok_or_else(|| ApiError::ExternalService("no content in Gemini response".to_string()))
    }
}

/// Wraps the user question in the fixed instruction template. Whether the
/// model actually honors the bullet format is up to the model; the reply is
/// relayed verbatim either way.
pub fn build_prompt(question: &str) -> String {
    format!(
        r#"You are OralCure, a medical education chatbot.

INSTRUCTIONS (follow exactly):
- Output EXACTLY 5 bullet points.
- Each bullet must be a SINGLE sentence.
- Do NOT repeat ideas across bullets.
- Do NOT restate the same advice in different words.
- No introductions, headings, or summaries.
- Educational information only (no diagnosis or treatment).
- The FINAL bullet must advise consulting a medical professional.

FORMAT (copy exactly, including bullet symbol):
• Bullet one sentence.
• Bullet two sentence.
• Bullet three sentence.
• Bullet four sentence.
• Bullet five sentence advising consultation with a medical professional.

User question:
{question}
"#
    )
}

fn extract_reply(result: &serde_json::Value) -> Option<String> {
    result["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_question_after_the_format_rules() {
        let prompt = build_prompt("What are early signs of oral cancer?");
        assert!(prompt.contains("EXACTLY 5 bullet points"));
        assert!(prompt.contains("consulting a medical professional"));
        assert!(prompt.ends_with("What are early signs of oral cancer?\n"));
    }

    #[test]
    fn reply_is_taken_from_the_first_candidate() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "• First bullet." }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(extract_reply(&response), Some("• First bullet.".to_string()));
    }

    #[test]
    fn missing_candidates_yield_none() {
        assert_eq!(extract_reply(&json!({})), None);
        assert_eq!(extract_reply(&json!({ "candidates": [] })), None);
    }
}
