pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use config::prompt::PromptTemplate;
use conversation::{ ConversationService, ServiceSettings };
use history::initialize_conversation_store;
use llm::chat::new_client as new_chat_client;
use llm::{ LlmConfig, LlmType };
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

/// Wires the store and inference client described by `args` into a service.
pub fn build_service(args: &Args) -> Result<ConversationService, Box<dyn Error + Send + Sync>> {
    let llm_type: LlmType = args.chat_llm_type
        .parse()
        .map_err(|e| format!("Invalid chat LLM type: {}", e))?;
    let template = match args.prompt_template.as_deref() {
        Some(name) => name.parse::<PromptTemplate>()?,
        None => PromptTemplate::for_backend(&llm_type),
    };

    let chat_config = LlmConfig {
        llm_type,
        api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
        completion_model: args.chat_model.clone(),
        base_url: args.chat_base_url.clone(),
    };
    let chat_client = new_chat_client(&chat_config)?;
    info!(
        "Chat client ready: model={}, endpoint={}",
        chat_client.get_model(),
        chat_client.get_base_url().unwrap_or_default()
    );

    let store = initialize_conversation_store(args)?;
    let settings = ServiceSettings {
        template,
        assistant_label: args.assistant_label.clone(),
        max_tokens: args.max_tokens,
        system_prompt: args.system_prompt.clone(),
        fallback_reply: args.fallback_reply.clone(),
    };

    Ok(ConversationService::new(store, chat_client, settings))
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Store Type: {}", args.store_type);
    info!("Store Host: {}", args.store_host);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Prompt Template: {}", args.prompt_template.as_deref().unwrap_or("(backend default)"));
    info!("Max Tokens: {}", args.max_tokens);
    info!("System Prompt: {}", if args.system_prompt.is_some() { "set" } else { "none" });
    info!("Generate Rate Limit: {}/s", args.generate_rate_limit);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let service = Arc::new(build_service(&args)?);
    info!("Using {} prompt template", service.settings().template);

    let server = Server::new(service, args);
    server.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn ollama_defaults_to_llama2_template() {
        let args = Args::parse_from([
            "kv-chat",
            "--store-type", "memory",
            "--chat-llm-type", "ollama",
        ]);
        let service = build_service(&args).expect("service");
        assert_eq!(service.settings().template, PromptTemplate::Llama2Chat);
        assert_eq!(service.settings().max_tokens, 350);
    }

    #[test]
    fn explicit_template_overrides_backend_default() {
        let args = Args::parse_from([
            "kv-chat",
            "--store-type", "memory",
            "--chat-llm-type", "openai",
            "--chat-api-key", "sk-test",
            "--prompt-template", "llama2-chat",
            "--assistant-label", "Bot",
        ]);
        let service = build_service(&args).expect("service");
        assert_eq!(service.settings().template, PromptTemplate::Llama2Chat);
        assert_eq!(service.settings().assistant_label, "Bot");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let args = Args::parse_from(["kv-chat", "--store-type", "memory", "--chat-llm-type", "palm"]);
        assert!(build_service(&args).is_err());
    }
}
