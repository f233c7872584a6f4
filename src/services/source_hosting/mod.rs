pub mod github;

pub use github::GitHubClient;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Event types that count towards a user's contribution heatmap
pub const CONTRIBUTION_EVENT_TYPES: [&str; 4] =
    ["PushEvent", "CreateEvent", "PullRequestEvent", "IssuesEvent"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    /// The server accepted the request but is still computing the result (HTTP 202)
    #[error("statistics are still being computed")]
    Pending,
}

/// Repository metadata as returned by `GET /repos/{owner}/{repo}`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RepoPayload {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<i64>,
    #[serde(default)]
    pub forks_count: Option<i64>,
    #[serde(default)]
    pub open_issues_count: Option<i64>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

impl RepoPayload {
    /// `pushed_at` in UTC, or `None` when absent or unparseable
    pub fn pushed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.pushed_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// One week of commit counts from the commit-activity statistics endpoint
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WeekBucket {
    /// UNIX timestamp of the week's first day (Sunday, 00:00 UTC)
    #[serde(default)]
    pub week: i64,
    /// Commit counts, Sunday first
    #[serde(default)]
    pub days: Vec<i64>,
    #[serde(default)]
    pub total: i64,
}

impl WeekBucket {
    pub fn start_date(&self) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp(self.week, 0).map(|ts| ts.date_naive())
    }
}

/// A public event from `GET /users/{username}/events/public`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Event {
    /// Calendar date of the event in the timestamp's own offset
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|ts| ts.date_naive())
    }

    pub fn is_contribution(&self) -> bool {
        self.event_type
            .as_deref()
            .is_some_and(|kind| CONTRIBUTION_EVENT_TYPES.contains(&kind))
    }
}

/// Parse an ISO-8601 timestamp. A `Z` suffix means UTC; a missing offset is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Read-only access to a source-hosting REST API
#[async_trait]
pub trait SourceHostingApi: Send + Sync {
    async fn fetch_repo(&self, full_name: &str) -> Result<RepoPayload, ApiError>;

    /// Raw README contents of the default branch
    async fn fetch_readme(&self, full_name: &str) -> Result<String, ApiError>;

    /// Weekly commit counts for the last year, oldest first.
    /// Returns [`ApiError::Pending`] while the server is still computing them.
    async fn fetch_commit_activity(&self, full_name: &str) -> Result<Vec<WeekBucket>, ApiError>;

    /// One page of the user's public events, newest first
    async fn fetch_user_events(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Event>, ApiError>;
}
