use crate::commands;
use crate::common::AiParams;
use crate::log_debug;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, crate_version};

const LOG_FILE: &str = "release-recap-debug.log";

/// CLI structure defining the command surface
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Release Recap: GitHub release notes, filtered and summarized",
    long_about = "Release Recap fetches the releases of a GitHub repository, filters them by an \
inclusive semantic version range, prints the matching release notes, and can summarize them \
with an OpenAI-compatible AI model.\n\nExample: release-recap microsoft/vscode --start 1.88.0 --summarize",
    styles = get_styles(),
)]
pub struct Cli {
    /// Target repository in 'owner/repo' form
    #[arg(
        value_name = "OWNER/REPO",
        help = "Target GitHub repository, e.g. 'microsoft/vscode'"
    )]
    pub repo: String,

    /// Lowest version to include
    #[arg(long, help = "Lowest version to include (inclusive)")]
    pub start: Option<String>,

    /// Highest version to include
    #[arg(long, help = "Highest version to include (inclusive)")]
    pub end: Option<String>,

    /// GitHub personal access token
    #[arg(long, help = "GitHub personal access token (defaults to GITHUB_TOKEN)")]
    pub token: Option<String>,

    /// Summarize the matching release notes with AI
    #[arg(
        short,
        long,
        help = "Summarize the matching release notes with AI (shows both the notes and the summary)"
    )]
    pub summarize: bool,

    #[command(flatten)]
    pub ai: AiParams,

    /// Suppress non-essential output
    #[arg(short = 'q', long = "quiet", help = "Suppress non-essential output")]
    pub quiet: bool,

    /// Log debug messages to a file
    #[arg(short = 'l', long = "log", help = "Log debug messages to a file")]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(long = "log-file", help = "Specify a custom log file path")]
    pub log_file: Option<String>,
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    crate::logger::init().map_err(|e| anyhow::anyhow!(e))?;
    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;
        log_debug!("Debug logging enabled (file: {})", log_file);
    } else {
        crate::logger::disable_logging();
    }

    // Set quiet mode in the UI module
    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    commands::handle_recap_command(cli).await
}
