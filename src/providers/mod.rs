/*!
 * Translation collaborators.
 *
 * The core never talks to a translation service directly; it goes through
 * the [`Translator`] trait. This module holds the trait and its
 * implementations:
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: Scriptable translator for tests
 */

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;

/// Common trait for all translation providers
///
/// One call translates one chunk of text. Implementations do not retry; the
/// translation service owns retries and backoff.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` from `source_language` to `target_language`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Fill `{source_language}` / `{target_language}` with readable language names
pub fn render_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    let name = |code: &str| language_utils::get_language_name(code).unwrap_or_else(|_| code.to_string());
    template
        .replace("{source_language}", &name(source_language))
        .replace("{target_language}", &name(target_language))
}

/// Build the translator selected by the configuration
pub fn create_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>, ProviderError> {
    let common = &config.common;
    let translator: Arc<dyn Translator> = match config.provider {
        TranslationProvider::Ollama => Arc::new(
            ollama::Ollama::new(&config.get_endpoint(), config.get_model(), config.get_timeout_secs())?
                .with_system_prompt(&common.system_prompt)
                .with_temperature(common.temperature),
        ),
        TranslationProvider::Anthropic => {
            let api_key = config.get_api_key();
            if api_key.is_empty() {
                return Err(ProviderError::AuthenticationError(
                    "Anthropic requires an API key".to_string(),
                ));
            }
            Arc::new(
                anthropic::Anthropic::new(api_key, config.get_endpoint(), config.get_model(), config.get_timeout_secs())?
                    .with_max_tokens(config.get_max_tokens())
                    .with_system_prompt(&common.system_prompt)
                    .with_temperature(common.temperature),
            )
        }
    };
    Ok(translator)
}

/// Map a non-success HTTP response to the matching provider error
pub(crate) async fn error_for_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());

    Err(error_from_status(status, message))
}

/// Provider error for a failed HTTP status and the response body
pub fn error_from_status(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

/// Map a transport-level reqwest failure to a provider error
pub(crate) fn error_for_transport(error: reqwest::Error) -> ProviderError {
    if error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
