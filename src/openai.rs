//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, YoyakuError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with configured timeout.
///
/// Long transcripts make for slow completions, hence the generous default.
/// The API key comes from `OPENAI_API_KEY`.
pub fn create_client() -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Client::with_config(OpenAIConfig::default()).with_http_client(http_client))
}

/// Whether `OPENAI_API_KEY` is set to something non-empty.
pub fn api_key_present() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.trim().is_empty())
}

/// Fail early with a readable message when no API key is configured.
pub fn require_api_key() -> Result<()> {
    if api_key_present() {
        Ok(())
    } else {
        Err(YoyakuError::OpenAI("OPENAI_API_KEY is not set".to_string()))
    }
}
