use std::error::Error as StdError;
use thiserror::Error;

use crate::config::prompt::PromptError;

/// Body sent for every failed request. Details stay in the log.
pub const GENERIC_ERROR_BODY: &str = "Something went wrong. Please try again.";

/// Faults raised while serving a conversation request.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("store error: {0}")]
    Store(#[source] Box<dyn StdError + Send + Sync>),

    #[error("invalid request: {0}")]
    Parse(String),

    #[error("inference failed: {0}")]
    Inference(#[source] Box<dyn StdError + Send + Sync>),

    #[error("prompt formatting failed: {0}")]
    Formatting(#[from] PromptError),

    #[error("stored conversation is unreadable: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatError {
    /// Short name of the fault class, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatError::Store(_) => "store",
            ChatError::Parse(_) => "parse",
            ChatError::Inference(_) => "inference",
            ChatError::Formatting(_) => "formatting",
            ChatError::Serialization(_) => "serialization",
        }
    }
}
