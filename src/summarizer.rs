use crate::chunker::{Chunk, ChunkPlanner};
use crate::llm::{CompletionClient, CompletionError, SummaryStream, Usage};
use crate::ui;
use crate::{log_debug, log_info};

/// The fixed report structure every summary must follow. A section with no
/// supporting information is labeled as such, never silently omitted.
const REPORT_SECTIONS: &str = "\
1.  **Major New Features**
2.  **Key Enhancements & Improvements**
3.  **Critical Bug Fixes**
4.  **Breaking Changes or Deprecations**
5.  **Overall Summary**";

/// Visible delimiter between partial summaries in the reduce prompt
const PARTIAL_DELIMITER: &str = "\n\n---\n\n";

/// How the notes are to be summarized, decided from their total length
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPlan {
    /// Everything fits in one streamed request
    Direct { content: String },
    /// Per-chunk extraction followed by a streamed consolidation
    MapReduce { chunks: Vec<Chunk> },
}

/// Orchestrates release-note summarization against the completion API.
///
/// The character budget is threaded in at construction time and governs both
/// the direct-vs-chunked decision and the chunk partitioning.
pub struct Summarizer {
    client: CompletionClient,
    planner: ChunkPlanner,
    budget: usize,
}

impl Summarizer {
    pub fn new(client: CompletionClient, budget: usize) -> Self {
        Self {
            client,
            planner: ChunkPlanner::new(budget),
            budget,
        }
    }

    /// Decide between the direct and map-reduce paths.
    ///
    /// Pure with respect to the network: no request is issued here.
    pub fn plan(&self, notes: &[String]) -> SummaryPlan {
        let content = notes.join("\n\n");
        if content.len() < self.budget {
            SummaryPlan::Direct { content }
        } else {
            SummaryPlan::MapReduce {
                chunks: self.planner.plan(notes),
            }
        }
    }

    /// Produce the final five-section summary as a fragment stream.
    ///
    /// Map-phase requests run strictly sequentially; any failure aborts the
    /// whole summarization before the reduce phase begins.
    pub async fn summarize(&self, notes: &[String]) -> Result<SummaryStream, CompletionError> {
        match self.plan(notes) {
            SummaryPlan::Direct { content } => {
                ui::print_info(&format!(
                    "Content fits in a single request ({} chars); streaming summary with model '{}'...",
                    content.len(),
                    self.client.model()
                ));
                self.client.complete_stream(&direct_prompt(&content)).await
            }
            SummaryPlan::MapReduce { chunks } => {
                ui::print_info(&format!(
                    "Content is too long; split into {} chunks for summarization with model '{}'...",
                    chunks.len(),
                    self.client.model()
                ));

                let mut partials = Vec::with_capacity(chunks.len());
                for (index, chunk) in chunks.iter().enumerate() {
                    let spinner = ui::create_spinner(&format!(
                        "Summarizing chunk {}/{}...",
                        index + 1,
                        chunks.len()
                    ));
                    let result = self.client.complete(&chunk_prompt(&chunk.text())).await;
                    spinner.finish_and_clear();

                    let completion = result?;
                    report_usage(completion.usage);
                    partials.push(completion.text);
                }

                log_debug!("All {} chunks summarized; consolidating", partials.len());
                ui::print_info("All chunks summarized; streaming the final report...");

                let combined = partials.join(PARTIAL_DELIMITER);
                self.client.complete_stream(&reduce_prompt(&combined)).await
            }
        }
    }
}

/// Surface a non-streamed call's token accounting as a diagnostic
fn report_usage(usage: Option<Usage>) {
    match usage {
        Some(usage) => {
            log_info!(
                "Token usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
            ui::print_message(&format!(
                "[token usage] prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            ));
        }
        None => ui::print_message("[token usage] not reported by the API"),
    }
}

/// Prompt for the direct path: one request covering every note
pub fn direct_prompt(content: &str) -> String {
    format!(
        "Based on the GitHub release notes below, produce a thorough, clear \
summary of what changed across these versions.

Organize the summary into the following sections (if a section has no \
supporting information in the provided content, state explicitly that none \
was mentioned):
{REPORT_SECTIONS}

Begin the summary directly, without preamble.

---
The release notes to summarize:
{content}
---"
    )
}

/// Prompt for the map phase: extract key points from a single chunk
pub fn chunk_prompt(content: &str) -> String {
    format!(
        "The following is one part of a larger series of GitHub release notes. \
Summarize the key points of only this part: new features, improvements, and \
bug fixes.

Your summary will be used as source material for a later consolidated \
report, so keep it accurate and concise.

---
The content of this part:
{content}
---"
    )
}

/// Prompt for the reduce phase: consolidate the partial summaries
pub fn reduce_prompt(content: &str) -> String {
    format!(
        "You have received several partial summaries covering a range of \
software releases. Merge them into a single, coherent, comprehensive final \
report. Remove duplicated points that appear across the partial summaries, \
and organize the report into the following sections:
{REPORT_SECTIONS}

If a section has no supporting information, state explicitly that none was \
mentioned.

---
The partial summaries to consolidate:
{content}
---"
    )
}
