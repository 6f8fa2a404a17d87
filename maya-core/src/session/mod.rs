//! Conversation session management
//!
//! The session holds the bounded message window submitted to the
//! chat-completion provider and persists transcripts as JSONL files.

pub mod manager;
pub mod store;

pub use manager::{TranscriptInfo, TranscriptManager};
pub use store::{ConversationSession, Message, Role, SessionConfig};
