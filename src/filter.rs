use crate::github::Release;
use crate::ui;
use crate::{log_debug, log_warn};
use semver::Version;
use thiserror::Error;

/// Substituted for a release body that is missing or blank after trimming
pub const EMPTY_BODY_PLACEHOLDER: &str = "(no release notes provided)";

/// Errors raised while constructing a version range
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid version bound '{input}': {source}")]
    InvalidRange {
        input: String,
        source: semver::Error,
    },
}

/// An inclusive range over semantic versions; `None` means unbounded
#[derive(Debug, Clone, Default)]
pub struct VersionRange {
    start: Option<Version>,
    end: Option<Version>,
}

impl VersionRange {
    /// Parse optional bound strings into a range.
    ///
    /// Fails before any release is touched if either bound is not a valid
    /// version.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, FilterError> {
        let start = start.map(parse_bound).transpose()?;
        let end = end.map(parse_bound).transpose()?;
        Ok(Self { start, end })
    }

    /// A release is kept iff it lies within both bounds
    pub fn contains(&self, version: &Version) -> bool {
        if let Some(start) = &self.start
            && version < start
        {
            return false;
        }
        if let Some(end) = &self.end
            && version > end
        {
            return false;
        }
        true
    }
}

/// A release together with the version parsed from its tag.
///
/// Produced by a pure parsing step so the API-sourced [`Release`] record is
/// never mutated in place.
#[derive(Debug, Clone)]
pub struct ParsedRelease {
    pub release: Release,
    pub version: Version,
}

/// Parse a version bound, surfacing the underlying semver error
fn parse_bound(input: &str) -> Result<Version, FilterError> {
    parse_version(input).map_err(|source| FilterError::InvalidRange {
        input: input.to_string(),
        source,
    })
}

/// Lenient version parse: GitHub tags commonly carry a leading `v`
fn parse_version(input: &str) -> Result<Version, semver::Error> {
    let trimmed = input.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    Version::parse(stripped)
}

/// Parse a release tag, returning `None` when it is not a version
pub fn parse_tag(tag: &str) -> Option<Version> {
    parse_version(tag).ok()
}

/// Filter releases down to those inside `range`, sorted by version
/// descending (newest first). Releases with unparseable tags are warned
/// about and dropped; they cannot be ordered or compared.
pub fn filter_releases(releases: Vec<Release>, range: &VersionRange) -> Vec<ParsedRelease> {
    let mut parsed: Vec<ParsedRelease> = releases
        .into_iter()
        .filter_map(|release| match parse_tag(&release.tag_name) {
            Some(version) => Some(ParsedRelease { release, version }),
            None => {
                ui::print_warning(&format!(
                    "Ignoring release with unparseable tag: {}",
                    release.tag_name
                ));
                log_warn!("Dropped unparseable tag '{}'", release.tag_name);
                None
            }
        })
        .collect();

    parsed.sort_by(|a, b| b.version.cmp(&a.version));
    parsed.retain(|release| range.contains(&release.version));

    log_debug!("{} releases inside the version range", parsed.len());
    parsed
}

/// Render one release into the text block passed to chunking and
/// summarization. Once rendered, the original release is no longer needed.
pub fn render_note(parsed: &ParsedRelease) -> String {
    let release = &parsed.release;
    let name = release
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or("N/A");
    let published = release.published_at.as_deref().unwrap_or("N/A");
    let body = release
        .body
        .as_deref()
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .unwrap_or(EMPTY_BODY_PLACEHOLDER);

    format!(
        "## Version: {tag} (name: {name})\nPublished: {published}\n---\n{body}",
        tag = release.tag_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tag_strips_v_prefix() {
        assert_eq!(parse_tag("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag("V1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_tag("1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn parse_tag_rejects_non_versions() {
        assert_eq!(parse_tag("nightly"), None);
        assert_eq!(parse_tag("v1.2"), None);
        assert_eq!(parse_tag(""), None);
    }
}
