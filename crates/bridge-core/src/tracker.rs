//! The issue tracker issues are filed in, with a relay adapter and a direct
//! GitHub REST adapter.

use crate::config::{RepoCoordinates, TrackerConfig, TrackerEndpoint};
use crate::error::{BridgeError, Result, Service};
use crate::upstream;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const GITHUB_API_VERSION: &str = "2022-11-28";

// ---------------------------------------------------------------------------
// TrackerIssue
// ---------------------------------------------------------------------------

/// An issue as reported back by the tracker right after creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerIssue {
    pub number: u64,
    pub state: String,
}

impl TrackerIssue {
    /// Status mirrored into the sheet: `Open` for an open issue, `Close` for
    /// any other state.
    pub fn sheet_status(&self) -> &'static str {
        if self.state == "open" {
            "Open"
        } else {
            "Close"
        }
    }
}

#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn create_issue(
        &self,
        repo: &RepoCoordinates,
        title: &str,
        body: &str,
    ) -> Result<TrackerIssue>;
}

/// Build the tracker adapter selected by configuration.
pub fn from_config(config: &TrackerConfig, timeout: Duration) -> Result<Arc<dyn IssueTracker>> {
    let tracker: Arc<dyn IssueTracker> = match &config.endpoint {
        TrackerEndpoint::Relay { url } => Arc::new(RelayTracker::new(url, timeout)?),
        TrackerEndpoint::GithubRest { api_url, token } => {
            Arc::new(GithubRestTracker::new(api_url, token, timeout)?)
        }
    };
    Ok(tracker)
}

// ---------------------------------------------------------------------------
// RelayTracker
// ---------------------------------------------------------------------------

/// Issue-creation relay: `POST {owner, repo, title, body}` answered with
/// `{issue: {number, state}}`.
#[derive(Debug, Clone)]
pub struct RelayTracker {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    issue: TrackerIssue,
}

impl RelayTracker {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: upstream::build_client(Service::Tracker, timeout)?,
        })
    }
}

#[async_trait]
impl IssueTracker for RelayTracker {
    async fn create_issue(
        &self,
        repo: &RepoCoordinates,
        title: &str,
        body: &str,
    ) -> Result<TrackerIssue> {
        let request = self.client.post(&self.url).json(&json!({
            "owner": repo.owner,
            "repo": repo.repo,
            "title": title,
            "body": body,
        }));
        let response: RelayResponse = upstream::send_json(Service::Tracker, request).await?;
        tracing::debug!(%repo, number = response.issue.number, state = %response.issue.state, "relay created issue");
        Ok(response.issue)
    }
}

// ---------------------------------------------------------------------------
// GithubRestTracker
// ---------------------------------------------------------------------------

/// `POST /repos/{owner}/{repo}/issues` on the GitHub REST API.
#[derive(Clone)]
pub struct GithubRestTracker {
    api_url: String,
    token: String,
    client: reqwest::Client,
}

impl fmt::Debug for GithubRestTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubRestTracker")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GithubRestTracker {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_url: api_url.into(),
            token: token.into(),
            client: upstream::build_client(Service::Tracker, timeout)?,
        })
    }

    fn issues_url(&self, repo: &RepoCoordinates) -> Result<Url> {
        let mut url = Url::parse(&self.api_url).map_err(|e| {
            BridgeError::upstream(
                Service::Tracker,
                format!("invalid API URL '{}': {e}", self.api_url),
            )
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                BridgeError::upstream(
                    Service::Tracker,
                    format!("API URL '{}' cannot take a path", self.api_url),
                )
            })?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str(), "issues"]);
        Ok(url)
    }
}

#[async_trait]
impl IssueTracker for GithubRestTracker {
    async fn create_issue(
        &self,
        repo: &RepoCoordinates,
        title: &str,
        body: &str,
    ) -> Result<TrackerIssue> {
        let request = self
            .client
            .post(self.issues_url(repo)?)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .json(&json!({ "title": title, "body": body }));
        let issue: TrackerIssue = upstream::send_json(Service::Tracker, request).await?;
        tracing::debug!(%repo, number = issue.number, state = %issue.state, "github created issue");
        Ok(issue)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
