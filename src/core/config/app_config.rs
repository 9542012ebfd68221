use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Character-count cap applied to analysis input unless overridden with
/// `ANALYSIS_MAX_CHARS`. A raw character slice, not tokens.
pub const DEFAULT_MAX_ANALYSIS_CHARS: usize = 4000;

/// Startup configuration problems. All of these are fatal: main renders the
/// message and exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OpenAI API key is missing! Please set OPENAI_API_KEY in the .env file.")]
    MissingApiKey,
    #[error("Google credentials file is missing! Please set GOOGLE_CREDENTIALS in the .env file.")]
    MissingCredentials,
    #[error("Google credentials file not found at {}", .0.display())]
    CredentialsNotFound(PathBuf),
}

/// Runtime configuration pulled from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub google_credentials: PathBuf,
    pub model: String,
    pub max_analysis_chars: usize,
    /// Directory scanned for cache files. Defaults to the working directory.
    pub cache_dir: PathBuf,
}

impl AppConfig {
    /// Reads the two required secrets plus optional overrides. An unset or
    /// empty required variable is an error, as is a credentials path that
    /// does not point at an existing file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = non_empty_var("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let google_credentials = non_empty_var("GOOGLE_CREDENTIALS")
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingCredentials)?;
        if !google_credentials.exists() {
            return Err(ConfigError::CredentialsNotFound(google_credentials));
        }

        let model = non_empty_var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let max_analysis_chars = non_empty_var("ANALYSIS_MAX_CHARS")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_ANALYSIS_CHARS);
        let cache_dir = non_empty_var("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            openai_api_key,
            google_credentials,
            model,
            max_analysis_chars,
            cache_dir,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
