use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// === 对话消息 ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role name on the generative service wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingSource>>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: format!("msg_{}", Uuid::new_v4()),
            role,
            text: text.into(),
            sources: None,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    /// 空列表视为没有引用
    pub fn with_sources(mut self, sources: Vec<GroundingSource>) -> Self {
        self.sources = if sources.is_empty() { None } else { Some(sources) };
        self
    }
}

/// Append-only conversation log. Entries are never edited or removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting(text: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.push(ChatMessage::assistant(text));
        transcript
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.entries.push(message);
        &self.entries[self.entries.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }
}
