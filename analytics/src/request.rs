//! Input validation producing an [`AnalysisRequest`].
//!
//! Every analysis run starts here: the repository URL must reduce to an
//! `owner/name` pair answering a live lookup, the branch must exist and the
//! time window must not be inverted. Nothing is fetched before validation
//! passes, and a validated request is read-only afterwards.

use chrono::{DateTime, NaiveDateTime, Utc};
use url::Url;

use crate::api::{Error, Query, Result, Transport};

/// Branch analyzed when the caller names none.
pub const DEFAULT_BRANCH: &str = "master";

/// Instant format accepted from the user, e.g. `2022.03.01 12:00:00`.
const INPUT_INSTANT_FORMAT: &str = "%Y.%m.%d %H:%M:%S";
/// Instant format the provider expects in `since`/`until` parameters.
const API_INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    /// API path of the repository, `repos/{owner}/{name}`.
    pub fn path(&self) -> String {
        format!("repos/{}/{}", self.owner, self.name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Rejects a window whose end precedes its start; either bound may be
    /// absent, which disables filtering on that side.
    pub fn new(since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(since), Some(until)) = (since, until) {
            if until < since {
                return Err(Error::InputData(
                    "Analysis time window is negative: end precedes start.".to_string(),
                ));
            }
        }
        Ok(TimeWindow { since, until })
    }

    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }
}

/// A validated analysis descriptor: repository, time window and branch.
/// Constructed only by [`AnalysisRequest::validate`] and immutable from then
/// on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    repo: RepoRef,
    window: TimeWindow,
    branch: String,
}

impl AnalysisRequest {
    /// Validates raw user input against the provider.
    ///
    /// * `raw_url` must be an http(s) URL ending with `/{owner}/{name}` of
    ///   word characters, and the repository must answer a success status.
    /// * `raw_start`/`raw_stop` use the `%Y.%m.%d %H:%M:%S` input format; an
    ///   omitted or unparsable bound individually falls back to "no bound".
    /// * `raw_branch` defaults to [`DEFAULT_BRANCH`] and must answer a
    ///   success status at `{repo}/branches/{branch}`.
    pub async fn validate(
        transport: &dyn Transport,
        raw_url: &str,
        raw_start: Option<&str>,
        raw_stop: Option<&str>,
        raw_branch: Option<&str>,
    ) -> Result<AnalysisRequest> {
        let repo = parse_repo_url(raw_url)?;
        let lookup = transport.get(&repo.path(), &Query::new()).await?;
        if !lookup.is_success() {
            return Err(Error::InputData(format!(
                "Repository {}/{} not found (HTTP {}).",
                repo.owner, repo.name, lookup.status
            )));
        }

        let window = TimeWindow::new(parse_instant(raw_start), parse_instant(raw_stop))?;

        let branch = match raw_branch {
            Some(branch) if !branch.trim().is_empty() => branch.trim().to_string(),
            _ => DEFAULT_BRANCH.to_string(),
        };
        let branch_path = format!("{}/branches/{}", repo.path(), branch);
        let lookup = transport.get(&branch_path, &Query::new()).await?;
        if !lookup.is_success() {
            return Err(Error::InputData(format!(
                "Branch {} does not exist (HTTP {}).",
                branch, lookup.status
            )));
        }

        Ok(AnalysisRequest { repo, window, branch })
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }
}

/// Reduces an http(s) URL to its two trailing path segments. Word characters
/// only, matching the provider's `owner/name` addressing.
fn parse_repo_url(raw: &str) -> Result<RepoRef> {
    let invalid = || Error::InputData(format!("Invalid repository URL: {}", raw));
    let parsed = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid());
    }
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        [.., owner, name] if is_word(owner) && is_word(name) => Ok(RepoRef {
            owner: (*owner).to_string(),
            name: (*name).to_string(),
        }),
        _ => Err(invalid()),
    }
}

fn is_word(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|raw| NaiveDateTime::parse_from_str(raw.trim(), INPUT_INSTANT_FORMAT).ok())
        .map(|naive| naive.and_utc())
}

/// Renders an instant the way the provider's `since`/`until` expect it.
pub(crate) fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format(API_INSTANT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeTransport;

    fn instant(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, INPUT_INSTANT_FORMAT).unwrap().and_utc()
    }

    #[test]
    fn window_accepts_ordered_bounds_test() {
        let start = instant("2022.01.01 00:00:00");
        let stop = instant("2022.02.01 00:00:00");
        assert!(TimeWindow::new(Some(start), Some(stop)).is_ok());
        assert!(TimeWindow::new(Some(start), Some(start)).is_ok());
        assert!(TimeWindow::new(None, Some(stop)).is_ok());
        assert!(TimeWindow::new(Some(start), None).is_ok());
        assert!(TimeWindow::new(None, None).is_ok());
    }

    #[test]
    fn window_rejects_inverted_bounds_test() {
        let start = instant("2022.02.01 00:00:00");
        let stop = instant("2022.01.01 00:00:00");
        assert!(matches!(
            TimeWindow::new(Some(start), Some(stop)),
            Err(Error::InputData(_))
        ));
    }

    #[test]
    fn parse_repo_url_test() {
        let repo = parse_repo_url("https://github.com/octo/demo").unwrap();
        assert_eq!(repo.path(), "repos/octo/demo");
        // Trailing slash is tolerated.
        let repo = parse_repo_url("https://github.com/octo/demo/").unwrap();
        assert_eq!(repo.path(), "repos/octo/demo");
    }

    #[test]
    fn parse_repo_url_rejects_test() {
        assert!(parse_repo_url("ftp://github.com/octo/demo").is_err());
        assert!(parse_repo_url("https://github.com/octo").is_err());
        assert!(parse_repo_url("https://github.com/octo/de-mo").is_err());
        assert!(parse_repo_url("not a url").is_err());
    }

    #[test]
    fn parse_instant_unparsable_is_absent_test() {
        assert!(parse_instant(None).is_none());
        assert!(parse_instant(Some("")).is_none());
        assert!(parse_instant(Some("yesterday")).is_none());
        assert!(parse_instant(Some("2022.01.01 00:00:00")).is_some());
    }

    #[tokio::test]
    async fn validate_defaults_branch_test() {
        let transport = FakeTransport::default()
            .ok("repos/octo/demo")
            .ok("repos/octo/demo/branches/master");
        let request = AnalysisRequest::validate(&transport, "https://github.com/octo/demo", None, None, None)
            .await
            .unwrap();
        assert_eq!(request.branch(), DEFAULT_BRANCH);
        assert_eq!(request.repo().path(), "repos/octo/demo");
        assert!(request.window().since().is_none());
    }

    #[tokio::test]
    async fn validate_rejects_missing_repo_test() {
        let transport = FakeTransport::default();
        let validated =
            AnalysisRequest::validate(&transport, "https://github.com/octo/ghost", None, None, None).await;
        assert!(matches!(validated, Err(Error::InputData(_))));
    }

    #[tokio::test]
    async fn validate_rejects_missing_branch_test() {
        let transport = FakeTransport::default().ok("repos/octo/demo");
        let validated = AnalysisRequest::validate(
            &transport,
            "https://github.com/octo/demo",
            None,
            None,
            Some("unknown"),
        )
        .await;
        assert!(matches!(validated, Err(Error::InputData(_))));
    }

    #[tokio::test]
    async fn validate_rejects_inverted_window_test() {
        let transport = FakeTransport::default().ok("repos/octo/demo");
        let validated = AnalysisRequest::validate(
            &transport,
            "https://github.com/octo/demo",
            Some("2022.02.01 00:00:00"),
            Some("2022.01.01 00:00:00"),
            None,
        )
        .await;
        assert!(matches!(validated, Err(Error::InputData(_))));
    }
}
