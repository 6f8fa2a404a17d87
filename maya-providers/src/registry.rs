//! Provider registry - metadata for known chat-completion endpoints

use maya_core::config::{ProviderConfig, ProvidersConfig};
use std::sync::Arc;

use crate::base::ChatProvider;
use crate::openai_compat::{OpenAiCompatClient, GROQ_API_BASE};

/// One provider's metadata
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    pub env_key: &'static str,
    pub default_api_base: &'static str,
    pub default_model: &'static str,
}

/// Registry of known providers
pub struct ProviderRegistry {
    providers: Vec<ProviderSpec>,
}

impl ProviderRegistry {
    /// Create a registry with the built-in providers
    pub fn new() -> Self {
        Self {
            providers: vec![
                ProviderSpec {
                    name: "groq",
                    display_name: "Groq",
                    env_key: "GROQ_API_KEY",
                    default_api_base: GROQ_API_BASE,
                    default_model: "llama-3.3-70b-versatile",
                },
                ProviderSpec {
                    name: "openai",
                    display_name: "OpenAI",
                    env_key: "OPENAI_API_KEY",
                    default_api_base: "https://api.openai.com/v1",
                    default_model: "gpt-4o-mini",
                },
                ProviderSpec {
                    name: "openrouter",
                    display_name: "OpenRouter",
                    env_key: "OPENROUTER_API_KEY",
                    default_api_base: "https://openrouter.ai/api/v1",
                    default_model: "meta-llama/llama-3.3-70b-instruct",
                },
                ProviderSpec {
                    name: "custom",
                    display_name: "Custom endpoint",
                    env_key: "",
                    default_api_base: "http://localhost:4000/v1",
                    default_model: "llama-3.3-70b-versatile",
                },
            ],
        }
    }

    /// Get all provider specs
    pub fn all(&self) -> &[ProviderSpec] {
        &self.providers
    }

    /// Find a provider by name
    pub fn find_by_name(&self, name: &str) -> Option<&ProviderSpec> {
        self.providers
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    /// Build a client for the first configured provider, groq first.
    /// Returns None when no provider has an API key or custom endpoint.
    pub fn client_from_config(
        &self,
        config: &ProvidersConfig,
        default_model: &str,
    ) -> Option<Arc<dyn ChatProvider>> {
        let candidates: [(&str, &ProviderConfig); 4] = [
            ("groq", &config.groq),
            ("openai", &config.openai),
            ("openrouter", &config.openrouter),
            ("custom", &config.custom),
        ];

        for (name, provider_config) in candidates {
            let has_key = !provider_config.api_key.trim().is_empty();
            let has_base = provider_config
                .api_base
                .as_deref()
                .is_some_and(|b| !b.trim().is_empty());
            if !has_key && !has_base {
                continue;
            }

            let spec = self.find_by_name(name)?;
            let api_base = provider_config
                .api_base
                .clone()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| spec.default_api_base.to_string());

            let api_key = if has_key {
                Some(provider_config.api_key.clone())
            } else {
                None
            };

            return Some(Arc::new(OpenAiCompatClient::new(
                api_key,
                Some(api_base),
                default_model.to_string(),
                provider_config.extra_headers.clone(),
            )));
        }

        None
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
