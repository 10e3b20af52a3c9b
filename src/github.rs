use crate::log_debug;
use reqwest::header::{HeaderMap, LINK};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL of the GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single release as returned by the GitHub Releases API
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Tag name (e.g., "v1.2.3")
    pub tag_name: String,
    /// Release name
    pub name: Option<String>,
    /// Published timestamp
    pub published_at: Option<String>,
    /// Release body (markdown)
    pub body: Option<String>,
    /// Is this a draft?
    #[serde(default)]
    pub draft: bool,
}

/// Errors surfaced while listing releases
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("repository '{0}' not found")]
    NotFound(String),

    #[error("GitHub token is invalid or lacks permission (HTTP {0})")]
    Unauthorized(u16),

    #[error("GitHub API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error while listing releases: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API returned an unexpected payload: {0}")]
    UnexpectedPayload(String),
}

/// Client for the GitHub Releases API
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_api_url(DEFAULT_API_URL, token)
    }

    /// Create a client against a custom API base URL (used by tests)
    pub fn with_api_url(
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Fetch every release of `owner/repo`, following pagination until the
    /// API stops handing out a `rel="next"` link. Draft releases are skipped.
    pub async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, FetchError> {
        let mut releases = Vec::new();
        let mut next = Some(format!(
            "{}/repos/{owner}/{repo}/releases?per_page={PER_PAGE}",
            self.api_url
        ));

        while let Some(page_url) = next {
            log_debug!("Fetching release page: {}", page_url);

            let response = self
                .http
                .get(&page_url)
                .header("Accept", "application/vnd.github+json")
                .header("X-GitHub-Api-Version", API_VERSION)
                .header(
                    "User-Agent",
                    concat!("release-recap/", env!("CARGO_PKG_VERSION")),
                )
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(match status.as_u16() {
                    404 => FetchError::NotFound(format!("{owner}/{repo}")),
                    401 | 403 => FetchError::Unauthorized(status.as_u16()),
                    code => {
                        let message = response.text().await.unwrap_or_default();
                        FetchError::Http {
                            status: code,
                            message,
                        }
                    }
                });
            }

            next = next_page_url(response.headers());

            let body = response.text().await?;
            let page: Vec<Release> = serde_json::from_str(&body)
                .map_err(|e| FetchError::UnexpectedPayload(e.to_string()))?;

            let fetched = page.len();
            let published = page.into_iter().filter(|release| !release.draft);
            let before = releases.len();
            releases.extend(published);

            let drafts = fetched - (releases.len() - before);
            if drafts > 0 {
                log_debug!("Skipped {} draft releases on this page", drafts);
            }
        }

        log_debug!("Fetched {} releases total", releases.len());
        Ok(releases)
    }
}

/// Split an `owner/repo` spec into its two components.
///
/// Returns `None` when the spec does not contain exactly one `/` separating
/// two non-empty parts.
pub fn parse_repo_spec(spec: &str) -> Option<(String, String)> {
    let (owner, repo) = spec.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Extract the `rel="next"` target from a response's `Link` header
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    parse_next_link(link)
}

/// Parse an RFC 5988 `Link` header value and return the `rel="next"` URL
pub(crate) fn parse_next_link(link: &str) -> Option<String> {
    for part in link.split(',') {
        let mut segments = part.trim().split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| param.trim() == "rel=\"next\"");
        if is_next {
            let url = target.strip_prefix('<')?.strip_suffix('>')?;
            return Url::parse(url).ok().map(String::from);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_repo_spec_valid() {
        assert_eq!(
            parse_repo_spec("microsoft/vscode"),
            Some(("microsoft".to_string(), "vscode".to_string()))
        );
    }

    #[test]
    fn parse_repo_spec_invalid() {
        assert!(parse_repo_spec("vscode").is_none());
        assert!(parse_repo_spec("/vscode").is_none());
        assert!(parse_repo_spec("microsoft/").is_none());
        assert!(parse_repo_spec("a/b/c").is_none());
        assert!(parse_repo_spec("").is_none());
    }

    #[test]
    fn parse_next_link_present() {
        let link = "<https://api.github.com/repos/o/r/releases?page=2>; rel=\"next\", \
                    <https://api.github.com/repos/o/r/releases?page=5>; rel=\"last\"";
        assert_eq!(
            parse_next_link(link),
            Some("https://api.github.com/repos/o/r/releases?page=2".to_string())
        );
    }

    #[test]
    fn parse_next_link_absent() {
        let link = "<https://api.github.com/repos/o/r/releases?page=1>; rel=\"prev\"";
        assert_eq!(parse_next_link(link), None);
    }
}
