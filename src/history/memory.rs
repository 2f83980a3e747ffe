use async_trait::async_trait;
use crate::history::ConversationStore;
use std::collections::HashMap;
use std::error::Error;
use tokio::sync::RwLock;

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryConversationStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn get(&self, id: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn exists(&self, id: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(self.entries.read().await.contains_key(id))
    }

    async fn set(&self, id: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.entries.write().await.insert(id.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.entries.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryConversationStore::new();
        assert_eq!(store.get("c1").await.expect("get"), None);

        store.set("c1", "one").await.expect("set");
        store.set("c1", "two").await.expect("overwrite");
        assert_eq!(store.get("c1").await.expect("get").as_deref(), Some("two"));
        assert!(store.exists("c1").await.expect("exists"));

        store.delete("c1").await.expect("delete");
        assert!(!store.exists("c1").await.expect("exists"));
    }

    #[tokio::test]
    async fn deleting_missing_key_is_ok() {
        let store = MemoryConversationStore::new();
        store.delete("never-written").await.expect("delete");
        assert_eq!(store.get("never-written").await.expect("get"), None);
    }
}
