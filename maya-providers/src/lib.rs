//! Chat-completion provider integrations for MAYA
//!
//! This crate provides the provider trait, the OpenAI-compatible HTTP
//! client (Groq by default), and a registry of known provider endpoints.

pub mod base;
pub mod openai_compat;
pub mod registry;

pub use base::{ChatProvider, Completion, ProviderError, ProviderResult};
pub use openai_compat::OpenAiCompatClient;
pub use registry::{ProviderRegistry, ProviderSpec};
