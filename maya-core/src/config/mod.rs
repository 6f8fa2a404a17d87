//! Configuration management

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::ConfigLoader;
pub use schema::{
    AssistantConfig, Config, EditorConfig, LoggingConfig, ProviderConfig, ProvidersConfig,
    ToolsConfig, WebSearchConfig, WebToolsConfig,
};
pub use validate::validate_config;
