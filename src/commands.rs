use crate::cli::Cli;
use crate::config::{self, AiConfig};
use crate::filter::{self, VersionRange};
use crate::github::{self, GitHubClient};
use crate::llm::{CompletionClient, CompletionError};
use crate::log_debug;
use crate::report;
use crate::summarizer::Summarizer;
use crate::ui;
use anyhow::Result;

/// Drive one full run: fetch, filter, report, and optionally summarize.
///
/// Every failure is converted into a user-facing diagnostic followed by an
/// early, clean return; nothing here crashes the process.
pub async fn handle_recap_command(cli: Cli) -> Result<()> {
    log_debug!(
        "Handling recap for '{}' (start: {:?}, end: {:?}, summarize: {})",
        cli.repo,
        cli.start,
        cli.end,
        cli.summarize
    );

    let Some((owner, repo)) = github::parse_repo_spec(&cli.repo) else {
        ui::print_error("Invalid repository format. Use 'owner/repo' (e.g. 'microsoft/vscode').");
        return Ok(());
    };

    let token = match config::resolve_github_token(cli.token.as_deref()) {
        Ok(token) => token,
        Err(e) => {
            ui::print_error(&e.to_string());
            return Ok(());
        }
    };

    // Resolve AI credentials up front so a misconfigured summarization run
    // aborts before any network call is made.
    let ai_config = if cli.summarize {
        match AiConfig::resolve(&cli.ai) {
            Ok(ai_config) => Some(ai_config),
            Err(e) => {
                ui::print_error(&e.to_string());
                return Ok(());
            }
        }
    } else {
        None
    };

    let range = match VersionRange::parse(cli.start.as_deref(), cli.end.as_deref()) {
        Ok(range) => range,
        Err(e) => {
            ui::print_error(&e.to_string());
            return Ok(());
        }
    };

    let client = match GitHubClient::new(token) {
        Ok(client) => client,
        Err(e) => {
            ui::print_error(&format!("Failed to set up the GitHub client: {e}"));
            return Ok(());
        }
    };

    ui::print_info(&format!(
        "Fetching releases from https://github.com/{owner}/{repo} ..."
    ));
    let spinner = ui::create_spinner("Listing releases...");
    let releases = client.list_releases(&owner, &repo).await;
    spinner.finish_and_clear();

    let releases = match releases {
        Ok(releases) => releases,
        Err(e) => {
            ui::print_error(&format!("Failed to list releases: {e}"));
            return Ok(());
        }
    };
    ui::print_info(&format!("Found {} releases.", releases.len()));

    let filtered = filter::filter_releases(releases, &range);
    let notes: Vec<String> = filtered.iter().map(filter::render_note).collect();
    ui::print_info(&format!(
        "{} releases matched the version range.",
        notes.len()
    ));

    report::print_raw_report(&notes);

    if let Some(ai_config) = ai_config {
        // The raw report already stated that nothing matched; no AI call.
        if notes.is_empty() {
            return Ok(());
        }

        if let Err(e) = summarize_notes(&ai_config, &notes).await {
            ui::print_error(&format!("AI summarization failed: {e}"));
            ui::print_info("Check your API key, base URL, and model name, then try again.");
        }
    }

    Ok(())
}

/// Run the summarization pipeline and stream the result to the terminal.
///
/// A failure here is fatal to the summary only; the raw report printed above
/// stands either way.
async fn summarize_notes(ai_config: &AiConfig, notes: &[String]) -> Result<(), CompletionError> {
    let client = CompletionClient::new(&ai_config.api_base, &ai_config.api_key, &ai_config.model)?;
    let summarizer = Summarizer::new(client, config::char_budget());

    report::print_summary_banner();
    let stream = summarizer.summarize(notes).await?;
    report::print_summary(stream).await
}
