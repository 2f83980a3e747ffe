use async_trait::async_trait;
use crate::history::ConversationStore;
use std::error::Error;
use redis::{ Client, AsyncCommands };

pub struct RedisConversationStore {
    client: Client,
    key_prefix: String,
}

impl RedisConversationStore {
    pub fn new(host: &str, key_prefix: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            client: Client::open(host)?,
            key_prefix: key_prefix.to_string(),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }

    fn key(&self, id: &str) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[async_trait]
impl ConversationStore for RedisConversationStore {
    async fn get(&self, id: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(self.key(id)).await?;
        Ok(value)
    }

    async fn exists(&self, id: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let found: bool = conn.exists(self.key(id)).await?;
        Ok(found)
    }

    async fn set(&self, id: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        conn.set::<_, _, ()>(self.key(id), value).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let _: i64 = conn.del(self.key(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_carry_prefix() {
        let store = RedisConversationStore::new("redis://127.0.0.1:6379", "chat:")
            .expect("client");
        assert_eq!(store.key("abc"), "chat:abc");
    }

    #[test]
    fn rejects_malformed_host() {
        assert!(RedisConversationStore::new("not a url", "chat:").is_err());
    }
}
