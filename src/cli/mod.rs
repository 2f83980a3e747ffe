use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Conversation Store Args ---
    /// Conversation store type (redis, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "redis")]
    pub store_type: String,

    /// Conversation store host endpoint (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "STORE_HOST", default_value = "redis://127.0.0.1:6379")]
    pub store_host: String,

    /// Prefix for conversation keys in the store.
    #[arg(long, env = "STORE_KEY_PREFIX", default_value = "chat:")]
    pub store_key_prefix: String,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for completion (openai, ollama)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "openai")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., http://localhost:11434 for Ollama)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider (required for OpenAI)
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for completion (e.g., gpt-3.5-turbo-instruct, llama2)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    // --- Prompt Args ---
    /// Prompt template (transcript, llama2-chat). Defaults to the one matching CHAT_LLM_TYPE.
    #[arg(long, env = "PROMPT_TEMPLATE")]
    pub prompt_template: Option<String>,

    /// Label written after the transcript so the model answers as the assistant.
    #[arg(long, env = "ASSISTANT_LABEL", default_value = "AI")]
    pub assistant_label: String,

    /// Upper bound on generated tokens per reply.
    #[arg(long, env = "MAX_TOKENS", default_value = "350")]
    pub max_tokens: u32,

    /// Optional system prompt seeded as the first turn of every new conversation.
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    /// Reply stored and returned when the model produces no text.
    #[arg(long, env = "FALLBACK_REPLY", default_value = "I guess the AI just gave up...")]
    pub fallback_reply: String,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Generate requests allowed per second across all clients. 0 disables the limit.
    #[arg(long, env = "GENERATE_RATE_LIMIT", default_value = "0")]
    pub generate_rate_limit: u32,

    /// Optional directory of static files (the chat UI) served for unmatched paths.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
