use crate::common::AiParams;
use crate::log_warn;
use anyhow::{Result, anyhow};
use url::Url;

/// Environment variable holding the GitHub personal access token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Environment variable holding the completion API key
pub const AI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the completion API base URL
pub const AI_API_BASE_ENV: &str = "OPENAI_API_BASE";
/// Environment variable holding the completion model name
pub const AI_MODEL_ENV: &str = "OPENAI_MODEL_NAME";
/// Environment variable overriding the chunking character budget
pub const CHAR_BUDGET_ENV: &str = "MAX_CHARS_FOR_SINGLE_CALL";

/// Model used when neither `--model` nor the environment names one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Character threshold below which all notes fit in a single completion call.
/// Conservative by convention: one token is roughly four characters, so the
/// default of 15000 characters leaves room for prompt boilerplate.
pub const DEFAULT_CHAR_BUDGET: usize = 15_000;

/// Resolved configuration for the completion API
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl AiConfig {
    /// Resolve AI settings from command-line parameters, falling back to the
    /// environment. Both the key and the base URL are required; the model
    /// falls back to [`DEFAULT_MODEL`].
    pub fn resolve(params: &AiParams) -> Result<Self> {
        let api_key = params
            .ai_api_key
            .clone()
            .or_else(|| env_non_empty(AI_API_KEY_ENV))
            .ok_or_else(|| {
                anyhow!(
                    "Missing AI API key. Pass --ai-api-key or set the {AI_API_KEY_ENV} environment variable."
                )
            })?;

        let api_base = params
            .ai_api_base
            .clone()
            .or_else(|| env_non_empty(AI_API_BASE_ENV))
            .ok_or_else(|| {
                anyhow!(
                    "Missing AI base URL. Pass --ai-api-base or set the {AI_API_BASE_ENV} environment variable."
                )
            })?;

        Url::parse(&api_base).map_err(|e| anyhow!("Invalid AI base URL '{api_base}': {e}"))?;

        let model = params
            .model
            .clone()
            .or_else(|| env_non_empty(AI_MODEL_ENV))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            api_base,
            model,
        })
    }
}

/// Resolve the GitHub token from the command line or the environment
pub fn resolve_github_token(flag: Option<&str>) -> Result<String> {
    flag.map(str::to_string)
        .or_else(|| env_non_empty(GITHUB_TOKEN_ENV))
        .ok_or_else(|| {
            anyhow!(
                "Missing GitHub token. Pass --token or set the {GITHUB_TOKEN_ENV} environment variable."
            )
        })
}

/// Character budget controlling the direct-vs-chunked summarization decision.
/// An unset or invalid override falls back to [`DEFAULT_CHAR_BUDGET`].
pub fn char_budget() -> usize {
    match std::env::var(CHAR_BUDGET_ENV) {
        Ok(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => {
                log_warn!(
                    "Ignoring invalid {} value '{}'; using default of {}",
                    CHAR_BUDGET_ENV,
                    raw,
                    DEFAULT_CHAR_BUDGET
                );
                DEFAULT_CHAR_BUDGET
            }
        },
        Err(_) => DEFAULT_CHAR_BUDGET,
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
