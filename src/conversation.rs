use crate::config::prompt::PromptTemplate;
use crate::error::ChatError;
use crate::history::ConversationStore;
use crate::llm::chat::ChatClient;
use crate::models::chat::{ Conversation, GenerateRequest, Role };

use log::{ debug, info };
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub template: PromptTemplate,
    pub assistant_label: String,
    pub max_tokens: u32,
    pub system_prompt: Option<String>,
    pub fallback_reply: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            template: PromptTemplate::Transcript,
            assistant_label: "AI".to_string(),
            max_tokens: 350,
            system_prompt: None,
            fallback_reply: "I guess the AI just gave up...".to_string(),
        }
    }
}

/// Keeps per-id conversation state in the store and asks the model for replies.
///
/// Generate is a plain read-modify-write with no locking: concurrent requests
/// for one id race and the last write wins.
pub struct ConversationService {
    store: Arc<dyn ConversationStore>,
    chat_client: Arc<dyn ChatClient>,
    settings: ServiceSettings,
}

impl ConversationService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        chat_client: Arc<dyn ChatClient>,
        settings: ServiceSettings
    ) -> Self {
        Self { store, chat_client, settings }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// The stored record, verbatim, or `None` when the id was never written.
    pub async fn history(&self, id: &str) -> Result<Option<String>, ChatError> {
        info!("Getting history for conversation ID {}", id);
        self.store.get(id).await.map_err(ChatError::Store)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ChatError> {
        info!("Deleting history for conversation ID {}", id);
        self.store.delete(id).await.map_err(ChatError::Store)
    }

    /// Parses a raw `{id, content}` body and runs one generate exchange.
    pub async fn generate(&self, body: &[u8]) -> Result<String, ChatError> {
        let request: GenerateRequest = serde_json::from_slice(body)
            .map_err(|e| ChatError::Parse(e.to_string()))?;
        if request.id.trim().is_empty() {
            return Err(ChatError::Parse("conversation id must not be empty".to_string()));
        }
        self.reply(&request.id, &request.content).await
    }

    pub async fn reply(&self, id: &str, content: &str) -> Result<String, ChatError> {
        info!("Generating reply for conversation ID {}", id);
        let mut chat = self.load_or_create(id).await?;
        chat.push(Role::User, content);

        let prompt = self.settings.template.render(&chat.turns, &self.settings.assistant_label)?;
        debug!("Rendered {} prompt ({} chars) for {}", self.settings.template, prompt.len(), id);

        let completion = self.chat_client
            .complete(&prompt, self.settings.max_tokens)
            .await
            .map_err(ChatError::Inference)?;

        let text = if completion.response.is_empty() {
            self.settings.fallback_reply.clone()
        } else {
            self.settings.template.sanitize(&completion.response).to_string()
        };
        chat.push(Role::Assistant, text.clone());

        let record = serde_json::to_string(&chat)?;
        self.store.set(id, &record).await.map_err(ChatError::Store)?;
        debug!("Conversation {} now holds {} turns", id, chat.turns.len());

        Ok(text)
    }

    async fn load_or_create(&self, id: &str) -> Result<Conversation, ChatError> {
        if self.store.exists(id).await.map_err(ChatError::Store)? {
            if let Some(record) = self.store.get(id).await.map_err(ChatError::Store)? {
                return Ok(serde_json::from_str(&record)?);
            }
        }

        let mut chat = Conversation::new(id);
        if let Some(system) = self.settings.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            chat.push(Role::System, system);
        }
        Ok(chat)
    }
}
