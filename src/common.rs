use clap::Args;

/// Parameters for the AI summarization backend, shared between the command
/// line and environment-based configuration.
#[derive(Args, Clone, Default, Debug)]
pub struct AiParams {
    /// API key for the OpenAI-compatible completion API
    #[arg(
        long = "ai-api-key",
        help = "API key for the OpenAI-compatible completion API (defaults to OPENAI_API_KEY)"
    )]
    pub ai_api_key: Option<String>,

    /// Base URL for the OpenAI-compatible completion API
    #[arg(
        long = "ai-api-base",
        help = "Base URL for the OpenAI-compatible completion API (defaults to OPENAI_API_BASE)"
    )]
    pub ai_api_base: Option<String>,

    /// Model name to use for summarization
    #[arg(
        long,
        help = "Model name to use for summarization (defaults to OPENAI_MODEL_NAME)"
    )]
    pub model: Option<String>,
}
