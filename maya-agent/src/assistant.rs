//! The assistant turn loop

use crate::context::ContextBuilder;
use maya_core::session::{ConversationSession, Role, SessionConfig};
use maya_core::{Error, Result};
use maya_providers::ChatProvider;
use std::sync::Arc;
use tracing::{debug, warn};

/// Drives one conversation with a chat provider.
///
/// Each turn appends the user message to the session, refreshes the
/// pinned system message (the persona plus the current time), sends the
/// full context, and records the reply. Provider errors surface
/// unchanged; the user turn stays in the session so a retry resends it
/// as history.
pub struct Assistant {
    session: ConversationSession,
    provider: Arc<dyn ChatProvider>,
    context: ContextBuilder,
}

impl Assistant {
    /// Create an assistant from session config and a provider
    pub fn new(config: SessionConfig, provider: Arc<dyn ChatProvider>) -> Self {
        let persona = config.system_prompt.clone().unwrap_or_default();
        Self {
            session: ConversationSession::new(config),
            provider,
            context: ContextBuilder::new(persona),
        }
    }

    /// Create an assistant around an existing session, e.g. one loaded
    /// from a transcript
    pub fn with_session(session: ConversationSession, provider: Arc<dyn ChatProvider>) -> Self {
        let persona = session
            .config()
            .system_prompt
            .clone()
            .unwrap_or_default();
        Self {
            session,
            provider,
            context: ContextBuilder::new(persona),
        }
    }

    /// The underlying conversation session
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// Mutable access for clear/save/load
    pub fn session_mut(&mut self) -> &mut ConversationSession {
        &mut self.session
    }

    /// Replace the session wholesale, e.g. after loading a transcript
    pub fn set_session(&mut self, session: ConversationSession) {
        self.session = session;
    }

    /// Run one turn: record the user message, call the provider, record
    /// and return the reply.
    pub async fn send(&mut self, input: &str) -> Result<String> {
        self.session.append(Role::User, input);
        self.session
            .append(Role::System, self.context.build_system_prompt());

        let config = self.session.config();
        let max_tokens = config.max_tokens;
        let temperature = config.temperature;
        let context = self.session.to_context();

        debug!(messages = context.len(), "sending completion request");

        let completion = self
            .provider
            .complete(&context, None, max_tokens, temperature)
            .await
            .map_err(|e| {
                warn!(error = %e, "provider request failed");
                Error::Provider(e.to_string())
            })?;

        self.session
            .append(Role::Assistant, completion.content.as_str());

        Ok(completion.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use maya_core::session::Message;
    use maya_providers::{Completion, ProviderError, ProviderResult};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct ScriptedProvider {
        replies: Mutex<Vec<ProviderResult<String>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<ProviderResult<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: &[Message],
            _model: Option<&str>,
            _max_tokens: u32,
            _temperature: f32,
        ) -> ProviderResult<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let reply = self.replies.lock().unwrap().remove(0)?;
            Ok(Completion {
                content: reply,
                finish_reason: "stop".to_string(),
                usage: HashMap::new(),
            })
        }

        fn default_model(&self) -> String {
            "scripted".to_string()
        }
    }

    fn test_config() -> SessionConfig {
        SessionConfig {
            system_prompt: Some("You are a test assistant.".to_string()),
            max_messages: 4,
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn test_send_records_both_turns() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("Hello there".to_string())]));
        let mut assistant = Assistant::new(test_config(), provider.clone());

        let reply = assistant.send("Hi").await.unwrap();
        assert_eq!(reply, "Hello there");

        let messages = assistant.session().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Hi");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Hello there");
    }

    #[tokio::test]
    async fn test_context_sent_system_first() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("ok".to_string())]));
        let mut assistant = Assistant::new(test_config(), provider.clone());

        assistant.send("question").await.unwrap();

        let seen = provider.seen.lock().unwrap();
        let context = &seen[0];
        assert_eq!(context[0].role, Role::System);
        assert!(context[0].content.starts_with("You are a test assistant."));
        assert_eq!(context.last().unwrap().content, "question");
    }

    #[tokio::test]
    async fn test_provider_error_keeps_user_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(ProviderError::Api(
            "429: rate limited".to_string(),
        ))]));
        let mut assistant = Assistant::new(test_config(), provider);

        let err = assistant.send("Hi").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));

        // The failed turn's user message stays for the next attempt.
        let messages = assistant.session().messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_window_bounded_across_turns() {
        let replies = (0..6).map(|i| Ok(format!("reply {}", i))).collect();
        let provider = Arc::new(ScriptedProvider::new(replies));
        let mut assistant = Assistant::new(test_config(), provider);

        for i in 0..6 {
            assistant.send(&format!("message {}", i)).await.unwrap();
        }

        // max_messages is 4, so only the last two exchanges remain.
        let messages = assistant.session().messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "message 4");
        assert_eq!(messages[3].content, "reply 5");
    }
}
