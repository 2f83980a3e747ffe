use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::llm::LlmType;
use crate::models::chat::{ Role, Turn };

const INST_START: &str = "<s>[INST] ";
const INST_END: &str = " [/INST]";
const SYS_START: &str = "<<SYS>>\n";
const SYS_END: &str = "\n<</SYS>>\n\n";
const TURN_CLOSE: &str = "</s>";

/// Trailing fragments a Llama-2 chat model emits when it starts the next
/// instruction block. Checked in order; only the first match is removed.
const END_OF_TURN_SUFFIXES: [&str; 12] = [
    "</s><s>[INST]",
    "</s><s>[INST",
    "</s><s>[INS",
    "</s><s>[IN",
    "</s><s>[I",
    "</s><s>[",
    "</s><s>",
    "</s><s",
    "</s><",
    "</s>",
    "</s",
    "</",
];

#[derive(Debug, PartialEq, Eq)]
pub enum PromptError {
    UnknownRole(String),
    UnknownTemplate(String),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::UnknownRole(role) => write!(f, "Unrecognized turn role '{}'", role),
            PromptError::UnknownTemplate(name) => write!(f, "Unknown prompt template '{}'", name),
        }
    }
}

impl Error for PromptError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// `Role: content` lines followed by an open cue for the assistant.
    Transcript,
    /// `[INST]` blocks as expected by Llama-2 chat models.
    Llama2Chat,
}

impl PromptTemplate {
    pub fn for_backend(llm_type: &LlmType) -> Self {
        match llm_type {
            LlmType::OpenAI => PromptTemplate::Transcript,
            LlmType::Ollama => PromptTemplate::Llama2Chat,
        }
    }

    pub fn render(&self, turns: &[Turn], assistant_label: &str) -> Result<String, PromptError> {
        match self {
            PromptTemplate::Transcript => Ok(render_transcript(turns, assistant_label)),
            PromptTemplate::Llama2Chat => render_llama2_chat(turns),
        }
    }

    /// Cleans generated text before it is stored and returned.
    pub fn sanitize<'a>(&self, text: &'a str) -> &'a str {
        match self {
            PromptTemplate::Transcript => text,
            PromptTemplate::Llama2Chat => strip_end_of_turn(text),
        }
    }
}

impl FromStr for PromptTemplate {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transcript" | "plain" => Ok(PromptTemplate::Transcript),
            "llama2-chat" | "llama2" => Ok(PromptTemplate::Llama2Chat),
            _ => Err(PromptError::UnknownTemplate(s.to_string())),
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptTemplate::Transcript => write!(f, "transcript"),
            PromptTemplate::Llama2Chat => write!(f, "llama2-chat"),
        }
    }
}

pub fn render_transcript(turns: &[Turn], assistant_label: &str) -> String {
    let mut prompt = String::new();
    for turn in turns {
        prompt.push_str(&format!("{}: {}\n", turn.role.label(), turn.content));
    }
    prompt.push_str(&format!("{}: ", assistant_label));
    prompt
}

pub fn render_llama2_chat(turns: &[Turn]) -> Result<String, PromptError> {
    let mut prompt = String::from(INST_START);
    let mut rest = turns;

    if let Some((first, tail)) = turns.split_first() {
        if first.role == Role::System {
            prompt.push_str(SYS_START);
            prompt.push_str(&first.content);
            prompt.push_str(SYS_END);
            rest = tail;
        }
    }

    for turn in rest {
        match &turn.role {
            // A late system turn has no block of its own and is sent inline.
            Role::User | Role::System => prompt.push_str(turn.content.trim()),
            Role::Assistant => {
                prompt.push_str(INST_END);
                prompt.push(' ');
                prompt.push_str(turn.content.trim());
                prompt.push_str(TURN_CLOSE);
                prompt.push_str(INST_START);
            }
            Role::Other(label) => return Err(PromptError::UnknownRole(label.clone())),
        }
    }

    prompt.push_str(INST_END);
    Ok(prompt)
}

pub fn strip_end_of_turn(text: &str) -> &str {
    END_OF_TURN_SUFFIXES
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .unwrap_or(text)
}
