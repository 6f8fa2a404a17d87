//! Assistant logic for MAYA
//!
//! Wires the conversation session to a chat provider: the context
//! builder assembles the system prompt, the assistant runs the
//! request/response turn loop.

pub mod assistant;
pub mod context;

pub use assistant::Assistant;
pub use context::ContextBuilder;
