use chrono::Utc;
use serde::{ Serialize, Deserialize };
use std::fmt;

/// Speaker of a turn. Unknown labels survive a load as `Other` so a bad record
/// fails at render time instead of at parse time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
    Other(String),
}

impl Role {
    /// Label used when a turn is written into a plain transcript.
    pub fn label(&self) -> &str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::Other(label) => label,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::System => "system".to_string(),
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
            Role::Other(label) => label,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().timestamp(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            turns: Vec::new(),
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
    }
}

/// Body of `POST /api/generate`. The browser client sends `message`.
#[derive(Clone, Debug, Deserialize)]
pub struct GenerateRequest {
    pub id: String,
    #[serde(alias = "message")]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrip_preserves_turn_order() {
        let mut chat = Conversation::new("c1");
        chat.push(Role::System, "be brief");
        chat.push(Role::User, "hi");
        chat.push(Role::Assistant, "hello");

        let json = serde_json::to_string(&chat).expect("serialize");
        let back: Conversation = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back, chat);
        let roles: Vec<Role> = back.turns.iter().map(|t| t.role.clone()).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn roles_are_stored_lowercase() {
        let turn = Turn { role: Role::Assistant, content: "ok".into(), timestamp: 7 };
        let value = serde_json::to_value(&turn).expect("serialize");
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "ok");
    }

    #[test]
    fn unknown_role_loads_as_other() {
        let chat: Conversation = serde_json::from_str(
            r#"{"id":"c1","turns":[{"role":"narrator","content":"once upon a time"}]}"#
        ).expect("deserialize");

        assert_eq!(chat.turns[0].role, Role::Other("narrator".into()));
        assert_eq!(chat.turns[0].timestamp, 0);
    }

    #[test]
    fn generate_request_accepts_message_alias() {
        let req: GenerateRequest = serde_json::from_str(r#"{"id":"c1","message":"hi"}"#)
            .expect("deserialize");
        assert_eq!(req.content, "hi");

        let req: GenerateRequest = serde_json::from_str(r#"{"id":"c1","content":"yo"}"#)
            .expect("deserialize");
        assert_eq!(req.content, "yo");
    }
}
