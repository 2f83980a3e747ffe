pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error as StdError;
use std::sync::Arc;
use super::{ LlmConfig, LlmType };
use self::ollama::OllamaClient;
use self::openai::OpenAICompletionClient;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: String,
}

/// A backend that continues a rendered prompt.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32
    ) -> Result<CompletionResponse, Box<dyn StdError + Send + Sync>>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> Option<String>;
}

pub fn new_client(
    config: &LlmConfig
) -> Result<Arc<dyn ChatClient>, Box<dyn StdError + Send + Sync>> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Ollama => {
            let specific_client = OllamaClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::OpenAI => {
            let specific_client = OpenAICompletionClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_ollama_client_with_defaults() {
        let config = LlmConfig { llm_type: LlmType::Ollama, ..LlmConfig::default() };
        let client = new_client(&config).expect("ollama client");
        assert_eq!(client.get_model(), "llama2");
        assert_eq!(client.get_base_url().as_deref(), Some("http://localhost:11434"));
    }

    #[test]
    fn openai_client_requires_api_key() {
        let config = LlmConfig::default();
        let err = new_client(&config).err().expect("missing key must fail");
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn builds_openai_client_with_key() {
        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            completion_model: Some("davinci-002".into()),
            ..LlmConfig::default()
        };
        let client = new_client(&config).expect("openai client");
        assert_eq!(client.get_model(), "davinci-002");
        assert_eq!(
            client.get_base_url().as_deref(),
            Some("https://api.openai.com/v1/completions")
        );
    }
}
