//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire-format name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat message. Immutable once appended; append order is the
/// conversation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,
    /// Message content
    pub content: String,
    /// Message timestamp (auxiliary; not part of transcript equivalence)
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Immutable per-session configuration, supplied at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Model identifier passed to the provider
    pub model: String,
    /// Maximum tokens per response
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum retained non-system messages
    pub max_messages: usize,
    /// Pinned system prompt, exempt from eviction
    pub system_prompt: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            max_messages: 20,
            system_prompt: None,
        }
    }
}

/// A conversation session: a pinned system message plus a bounded,
/// FIFO-evicted window of user/assistant messages.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    config: SessionConfig,
    system: Option<Message>,
    window: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Create a new session, seeding the pinned system message from config
    pub fn new(config: SessionConfig) -> Self {
        let now = Utc::now();
        let system = config.system_prompt.as_deref().map(Message::system);
        Self {
            config,
            system,
            window: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The pinned system message, if any
    pub fn system_message(&self) -> Option<&Message> {
        self.system.as_ref()
    }

    /// Retained non-system messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.window
    }

    /// Number of retained non-system messages
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True when the window holds no messages
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Session creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation time
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Append a message. A `System` append replaces the pinned system
    /// message; anything else lands at the end of the window, evicting
    /// the oldest entries once the window exceeds `max_messages`.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        let message = Message::new(role, content);
        match role {
            Role::System => self.system = Some(message),
            _ => {
                self.window.push(message);
                self.evict();
            }
        }
        self.updated_at = Utc::now();
    }

    fn evict(&mut self) {
        while self.window.len() > self.config.max_messages {
            self.window.remove(0);
        }
    }

    /// The ordered message sequence for the completion provider:
    /// system message first (if present), then the retained window.
    pub fn to_context(&self) -> Vec<Message> {
        let mut context = Vec::with_capacity(self.window.len() + 1);
        if let Some(system) = &self.system {
            context.push(system.clone());
        }
        context.extend(self.window.iter().cloned());
        context
    }

    /// Discard all history, keeping only the configured system message
    pub fn clear(&mut self) {
        self.window.clear();
        self.system = self.config.system_prompt.as_deref().map(Message::system);
        self.updated_at = Utc::now();
    }

    /// Serialize the transcript to a JSONL file: one metadata line,
    /// then one message object per line.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let metadata = serde_json::json!({
            "_type": "transcript",
            "created_at": self.created_at.to_rfc3339(),
            "updated_at": self.updated_at.to_rfc3339(),
            "model": self.config.model,
        });

        let mut lines = vec![serde_json::to_string(&metadata)?];
        for msg in self.to_context() {
            lines.push(serde_json::to_string(&msg)?);
        }

        std::fs::write(path, lines.join("\n"))?;
        Ok(())
    }

    /// Replace the in-memory sequence with a transcript read from disk.
    ///
    /// The whole file is parsed into a staging buffer before anything is
    /// replaced, so a malformed transcript leaves the session untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = std::fs::read_to_string(path)?;

        let mut system = None;
        let mut window = Vec::new();
        let mut created_at = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: serde_json::Value = serde_json::from_str(line)
                .map_err(|e| Error::Serialization(format!("invalid transcript line: {}", e)))?;

            if value.get("_type").and_then(|v| v.as_str()) == Some("transcript") {
                created_at = value
                    .get("created_at")
                    .and_then(|v| v.as_str())
                    .and_then(|s| s.parse().ok());
                continue;
            }

            let msg: Message = serde_json::from_value(value)
                .map_err(|e| Error::Serialization(format!("invalid transcript entry: {}", e)))?;
            match msg.role {
                Role::System => system = Some(msg),
                _ => window.push(msg),
            }
        }

        self.system = system;
        self.window = window;
        self.evict();
        self.created_at = created_at.unwrap_or(self.created_at);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_with(max_messages: usize, system_prompt: Option<&str>) -> SessionConfig {
        SessionConfig {
            max_messages,
            system_prompt: system_prompt.map(str::to_string),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut session = ConversationSession::new(config_with(20, None));
        session.append(Role::User, "one");
        session.append(Role::Assistant, "two");
        session.append(Role::User, "three");

        let context = session.to_context();
        let contents: Vec<_> = context.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_system_message_always_first() {
        let mut session = ConversationSession::new(config_with(20, Some("Be brief.")));
        session.append(Role::User, "hi");

        let context = session.to_context();
        assert_eq!(context[0].role, Role::System);
        assert_eq!(context[0].content, "Be brief.");
        assert_eq!(context[1].content, "hi");
    }

    #[test]
    fn test_eviction_window() {
        let mut session = ConversationSession::new(config_with(2, Some("You are MAYA.")));
        session.append(Role::User, "hi");
        session.append(Role::Assistant, "hello");
        session.append(Role::User, "bye");

        let context = session.to_context();
        assert_eq!(context.len(), 3);
        assert_eq!(context[0].role, Role::System);
        assert_eq!(context[0].content, "You are MAYA.");
        assert_eq!(context[1].role, Role::Assistant);
        assert_eq!(context[1].content, "hello");
        assert_eq!(context[2].role, Role::User);
        assert_eq!(context[2].content, "bye");
    }

    #[test]
    fn test_eviction_never_exceeds_bound() {
        let mut session = ConversationSession::new(config_with(5, Some("sys")));
        for i in 0..60 {
            session.append(Role::User, format!("msg {}", i));
        }

        assert_eq!(session.len(), 5);
        let contents: Vec<_> = session
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["msg 55", "msg 56", "msg 57", "msg 58", "msg 59"]);
    }

    #[test]
    fn test_system_append_replaces_pinned() {
        let mut session = ConversationSession::new(config_with(2, Some("old prompt")));
        session.append(Role::System, "new prompt");

        assert_eq!(session.system_message().unwrap().content, "new prompt");
        assert!(session.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut session = ConversationSession::new(config_with(10, Some("sys")));
        session.append(Role::User, "hi");
        session.append(Role::Assistant, "hello");

        session.clear();
        let once: Vec<_> = session.to_context().iter().map(|m| m.content.clone()).collect();
        session.clear();
        let twice: Vec<_> = session.to_context().iter().map(|m| m.content.clone()).collect();

        assert_eq!(once, vec!["sys".to_string()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat.jsonl");

        let mut session = ConversationSession::new(config_with(20, Some("You are MAYA.")));
        session.append(Role::User, "hi");
        session.append(Role::Assistant, "hello there");
        session.save(&path).unwrap();

        let mut restored = ConversationSession::new(config_with(20, None));
        restored.load(&path).unwrap();

        let original: Vec<_> = session
            .to_context()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect();
        let loaded: Vec<_> = restored
            .to_context()
            .iter()
            .map(|m| (m.role, m.content.clone()))
            .collect();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_save_unwritable_path_leaves_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("chat.jsonl");

        let mut session = ConversationSession::new(config_with(20, Some("sys")));
        session.append(Role::User, "hi");

        let err = session.save(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].content, "hi");
    }

    #[test]
    fn test_load_malformed_leaves_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.jsonl");
        std::fs::write(&path, "this is not json\n{\"role\":\"user\"").unwrap();

        let mut session = ConversationSession::new(config_with(20, Some("sys")));
        session.append(Role::User, "keep me");

        let err = session.load(&path).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(session.len(), 1);
        assert_eq!(session.messages()[0].content, "keep me");
        assert_eq!(session.system_message().unwrap().content, "sys");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = ConversationSession::new(config_with(20, None));
        let err = session.load(temp_dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_accepts_bare_role_content_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("external.jsonl");
        std::fs::write(
            &path,
            "{\"role\":\"system\",\"content\":\"sys\"}\n{\"role\":\"user\",\"content\":\"hi\"}",
        )
        .unwrap();

        let mut session = ConversationSession::new(config_with(20, None));
        session.load(&path).unwrap();

        assert_eq!(session.system_message().unwrap().content, "sys");
        assert_eq!(session.messages()[0].content, "hi");
    }

    #[test]
    fn test_load_reapplies_window_bound() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("long.jsonl");

        let mut big = ConversationSession::new(config_with(50, None));
        for i in 0..10 {
            big.append(Role::User, format!("m{}", i));
        }
        big.save(&path).unwrap();

        let mut small = ConversationSession::new(config_with(3, None));
        small.load(&path).unwrap();
        assert_eq!(small.len(), 3);
        assert_eq!(small.messages()[0].content, "m7");
    }
}
