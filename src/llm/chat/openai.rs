use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ChatClient, CompletionResponse};
use crate::llm::LlmConfig;

/// Client for the legacy text completion endpoint, which continues a raw
/// prompt rather than a message list.
pub struct OpenAICompletionClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAICompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAICompletionResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    #[serde(default)]
    text: Option<String>,
}

impl OpenAICompletionResponse {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.text)
            .unwrap_or_default()
    }
}

impl OpenAICompletionClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let completion_model = model.unwrap_or_else(|| "gpt-3.5-turbo-instruct".to_string());
        let api_url = base_url.unwrap_or_else(|| "https://api.openai.com/v1/completions".to_string());
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            model: completion_model,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        if config.llm_type != crate::llm::LlmType::OpenAI {
            return Err("Invalid config type for OpenAICompletionClient".into());
        }
        let api_key = config.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| "OpenAI API key is required".to_string())?;

        Self::new(
            api_key,
            config.completion_model.clone(),
            config.base_url.clone(),
        )
    }
}

#[async_trait]
impl ChatClient for OpenAICompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>> {
        let req = OpenAICompletionRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            max_tokens,
        };
        debug!("OpenAI completion: model={}, prompt_len={}", self.model, prompt.len());

        let resp = self.http.post(&self.base_url).json(&req).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            warn!("OpenAI completion failed with {}: {}", status, body);
            return Err(format!("OpenAI API error: {}", status).into());
        }

        let data = resp.json::<OpenAICompletionResponse>().await?;
        Ok(CompletionResponse { response: data.into_text() })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> Option<String> {
        Some(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_text_of_first_choice() {
        let data: OpenAICompletionResponse = serde_json::from_str(
            r#"{"choices":[{"text":" Hello there."},{"text":"ignored"}]}"#
        ).expect("deserialize");
        assert_eq!(data.into_text(), " Hello there.");
    }

    #[test]
    fn missing_choice_text_is_empty() {
        let data: OpenAICompletionResponse = serde_json::from_str(r#"{"choices":[{}]}"#)
            .expect("deserialize");
        assert_eq!(data.into_text(), "");

        let data: OpenAICompletionResponse = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(data.into_text(), "");
    }

    #[test]
    fn rejects_empty_api_key() {
        let config = LlmConfig { api_key: Some(String::new()), ..LlmConfig::default() };
        assert!(OpenAICompletionClient::from_config(&config).is_err());
    }
}
