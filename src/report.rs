use crate::llm::{CompletionError, SummaryStream};
use crate::ui;
use colored::Colorize;
use futures::StreamExt;
use std::io::Write;

const BANNER_WIDTH: usize = 60;

/// Print a banner-delimited section title
fn print_banner(title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{}", rule.bright_blue());
    println!("{}", format!("{title:^BANNER_WIDTH$}").bold());
    println!("{}\n", rule.bright_blue());
}

/// Print the filtered release notes, or a notice when nothing matched
pub fn print_raw_report(notes: &[String]) {
    if notes.is_empty() {
        ui::print_info("No releases matched the requested version range.");
        return;
    }

    print_banner("Matching Release Notes");
    println!("{}", notes.join("\n\n"));
}

/// Print the AI summary section header
pub fn print_summary_banner() {
    print_banner("AI Release Summary");
}

/// Print the summary fragments as they arrive, flushing after each one so
/// output is progressive rather than a single flush at the end.
pub async fn print_summary(mut stream: SummaryStream) -> Result<(), CompletionError> {
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    }
    println!("\n");
    Ok(())
}
