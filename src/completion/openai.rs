//! OpenAI Chat Completions API連携

use super::{ChatRequest, CompletionProvider};
use crate::error::{KeywordTaggerError, Result};
use serde::Deserialize;

/// Chat Completionsレスポンス
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

/// エラーレスポンス `{"error": {"message": "..."}}`
#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| KeywordTaggerError::ApiCall(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(provider_error(status.as_u16(), &body));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| KeywordTaggerError::ApiParse(e.to_string()))?;

        Ok(payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

/// 非2xx応答からエラーを作る（プロバイダーのメッセージがあれば優先）
fn provider_error(status: u16, body: &str) -> KeywordTaggerError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => KeywordTaggerError::Provider(parsed.error.message),
        Err(_) => KeywordTaggerError::ApiCall(format!("API error {}: {}", status, body)),
    }
}
