/*!
 * Provider-backed translation client.
 *
 * `TranslationService` turns the configured provider into a
 * `TranslationClient`: one request per paragraph, built from the
 * configured system prompt, model, temperature and token cap.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, info};
use std::time::Instant;
use url::Url;

use crate::app_config::{Config, TranslationConfig, TranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use super::cache::{TranslationCache, preview};
use super::client::TranslationClient;

/// Check an endpoint is a usable base URL, adding `http://` when no scheme is given
fn parse_endpoint(endpoint: &str) -> Result<String> {
    if endpoint.trim().is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };
    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    Gemini { client: Gemini },
    Anthropic { client: Anthropic },
    Ollama { client: Ollama },
}

/// Translation client for one language pair over the configured provider
pub struct TranslationService {
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    pub source_language: String,
    pub target_language: String,

    /// Filled prompt sent with every request
    system_prompt: String,

    /// Accepted translations, keyed by paragraph and language pair
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Build a service for the configured provider and language pair
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_languages(config.translation.clone(), &config.source_language, &config.target_language)
    }

    pub fn with_languages(config: TranslationConfig, source_language: &str, target_language: &str) -> Result<Self> {
        let endpoint = parse_endpoint(&config.get_endpoint())?;
        let model = config.get_model();
        let timeout = config.get_timeout_secs();

        let provider = match config.provider {
            TranslationProvider::Gemini => TranslationProviderImpl::Gemini {
                client: Gemini::new_with_timeout(config.get_api_key(), endpoint, model, timeout),
            },
            TranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new_with_timeout(config.get_api_key(), endpoint, model, timeout),
            },
            TranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::from_url(endpoint, timeout),
            },
        };

        let system_prompt = config.system_prompt_for(source_language, target_language);
        debug!(
            "Translation service ready: {} model {} ({} -> {})",
            config.provider,
            config.get_model(),
            source_language,
            target_language
        );

        Ok(Self {
            provider,
            config,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            system_prompt,
            cache: TranslationCache::new(true),
        })
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<()> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider,
            self.config.get_model()
        );
        let result = match &self.provider {
            TranslationProviderImpl::Gemini { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
        };
        result.map_err(|e| anyhow!("Failed to connect to {}: {}", self.config.provider.display_name(), e))
    }

    /// One provider call, no cache
    async fn request(&self, text: &str) -> Result<String, ProviderError> {
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;
        let max_tokens = self.config.get_max_output_tokens();

        match &self.provider {
            TranslationProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(model, text)
                    .system(self.system_prompt.as_str())
                    .temperature(temperature)
                    .max_output_tokens(max_tokens);
                let response = client.complete(request).await?;
                Ok(Gemini::extract_text(&response))
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, max_tokens)
                    .system(self.system_prompt.as_str())
                    .add_message("user", text)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ok(Anthropic::extract_text(&response))
            }
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(model, text)
                    .system(self.system_prompt.as_str())
                    .temperature(temperature)
                    .num_predict(max_tokens);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl TranslationClient for TranslationService {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        if let Some(cached) = self.cache.get(text, &self.source_language, &self.target_language) {
            return Ok(cached);
        }

        let start = Instant::now();
        let translated = self.request(text).await?;
        debug!(
            "{} answered in {:?} for '{}'",
            self.config.provider.display_name(),
            start.elapsed(),
            preview(text, 40)
        );

        if translated.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        if translated.trim() != text.trim() {
            self.cache
                .store(text, &self.source_language, &self.target_language, &translated);
        }
        Ok(translated)
    }
}
