//! Provider router: selects the correct LLM provider based on config.

use std::collections::HashMap;
use std::sync::Arc;

use reverie_config::AppConfig;
use reverie_core::error::ProviderError;
use reverie_core::provider::Provider;
use tracing::warn;

use crate::openai_compat::OpenAiCompatProvider;

/// Holds the configured providers, keyed by name.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get the default provider or explain why there is none.
    pub fn require_default(&self) -> Result<Arc<dyn Provider>, ProviderError> {
        self.default().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "provider '{}' has no api_url and no built-in endpoint",
                self.default_provider
            ))
        })
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }
}

/// Build providers from configuration.
///
/// Every `[providers.<name>]` table is registered, and the default provider
/// is added from built-in endpoints when it has no table of its own.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let Some(base_url) = provider_config
            .api_url
            .clone()
            .or_else(|| default_base_url(name).map(String::from))
        else {
            warn!(provider = %name, "Skipping provider with no api_url");
            continue;
        };

        router.register(
            name.clone(),
            Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)),
        );
    }

    if router.get(&config.default_provider).is_none() {
        if let Some(base_url) = default_base_url(&config.default_provider) {
            let api_key = config.api_key.clone().unwrap_or_default();
            router.register(
                config.default_provider.clone(),
                Arc::new(OpenAiCompatProvider::new(
                    &config.default_provider,
                    base_url,
                    api_key,
                )),
            );
        }
    }

    router
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "deepseek" => Some("https://api.deepseek.com/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "lmstudio" => Some("http://localhost:1234/v1"),
        "llamacpp" | "llama.cpp" => Some("http://localhost:8080/v1"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_config::ProviderConfig;

    #[test]
    fn router_register_and_lookup() {
        let mut router = ProviderRouter::new("openai");
        router.register("openai", Arc::new(OpenAiCompatProvider::openai("sk-test")));

        assert!(router.get("openai").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").unwrap().contains("openrouter.ai"));
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("ollama").unwrap().contains("localhost:11434"));
        assert!(default_base_url("mystery").is_none());
    }

    #[test]
    fn build_from_default_config() {
        let router = build_from_config(&AppConfig::default());
        assert_eq!(router.require_default().unwrap().name(), "openai");
    }

    #[test]
    fn custom_provider_needs_url() {
        let mut config = AppConfig {
            default_provider: "homelab".into(),
            ..AppConfig::default()
        };
        let router = build_from_config(&config);
        assert!(matches!(
            router.require_default(),
            Err(ProviderError::NotConfigured(_))
        ));

        config.providers.insert(
            "homelab".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("http://10.0.0.5:8000/v1".into()),
            },
        );
        let router = build_from_config(&config);
        assert_eq!(router.require_default().unwrap().name(), "homelab");
        assert!(router.get("openai").is_none());
    }
}
