mod memory;
mod redis;
use async_trait::async_trait;
use log::info;
use std::error::Error;
use crate::cli::Args;
use std::sync::Arc;

pub use memory::MemoryConversationStore;
pub use self::redis::RedisConversationStore;

/// Durable key-value access to serialized conversations, keyed by conversation id.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;

    async fn exists(&self, id: &str) -> Result<bool, Box<dyn Error + Send + Sync>>;

    async fn set(&self, id: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Removing a missing key is not an error.
    async fn delete(&self, id: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub fn create_conversation_store(
    args: &Args
) -> Result<Arc<dyn ConversationStore>, Box<dyn Error + Send + Sync>> {
    match args.store_type.to_lowercase().as_str() {
        "redis" => {
            let store = RedisConversationStore::new(&args.store_host, &args.store_key_prefix)?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryConversationStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported conversation store type: {}", args.store_type)
                    )
                )
            ),
    }
}

pub fn initialize_conversation_store(
    args: &Args
) -> Result<Arc<dyn ConversationStore>, Box<dyn Error + Send + Sync>> {
    if args.store_type.eq_ignore_ascii_case("memory") {
        info!("Conversations will be kept in process memory");
    } else {
        info!("Conversations will be stored in: {} at {}", args.store_type, args.store_host);
    }
    create_conversation_store(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn memory_store_from_args() {
        let args = Args::parse_from(["kv-chat", "--store-type", "memory"]);
        let store = initialize_conversation_store(&args).expect("memory store");
        store.set("c1", "{}").await.expect("set");
        assert!(store.exists("c1").await.expect("exists"));
    }

    #[test]
    fn unknown_store_type_is_rejected() {
        let args = Args::parse_from(["kv-chat", "--store-type", "sqlite"]);
        let err = create_conversation_store(&args).err().expect("must fail");
        assert!(err.to_string().contains("sqlite"));
    }

    #[test]
    fn redis_store_opens_lazily() {
        let args = Args::parse_from(["kv-chat", "--store-host", "redis://127.0.0.1:1"]);
        assert!(create_conversation_store(&args).is_ok());
    }
}
