use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::services::cache_store::{self, SnapshotUpdate};
use crate::services::clock::Clock;
use crate::services::content;
use crate::services::source_hosting::{ApiError, Event, RepoPayload, SourceHostingApi, WeekBucket};
use crate::utils::validators::{validate_repo_full_name, validate_username};

/// Activity points older than this many days are evicted
pub const ACTIVITY_WINDOW_DAYS: i64 = 90;
/// Weekly buckets considered from the commit-activity response (about 91 days)
pub const ACTIVITY_WEEKS: usize = 13;
pub const EVENTS_PER_PAGE: u32 = 100;
/// Hard cap on event pages per run to stay well inside the API rate limit
pub const MAX_EVENT_PAGES: u32 = 10;

/// Pulls repository metadata, commit activity and user contributions into the cache tables.
///
/// Runs are sequential and hold no state between them: each run re-derives the
/// cached windows from the API plus whatever the cache already holds.
pub struct GitHubSyncService {
    db: DatabaseConnection,
    api: Arc<dyn SourceHostingApi>,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProjectOutcome {
    Synced { activity_days: usize, evicted: u64 },
    /// Snapshot refreshed, commit statistics still being computed upstream
    ActivityPending,
    /// Snapshot refreshed, commit statistics request failed
    ActivityFailed { error: String },
    Failed { error: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub repo_full_name: String,
    pub outcome: ProjectOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributionReport {
    pub username: String,
    pub pages_fetched: u32,
    pub events_counted: u32,
    pub days_written: usize,
    pub evicted: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub projects: Vec<ProjectReport>,
    pub contributions: ContributionReport,
}

impl SyncReport {
    pub fn projects_synced(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| {
                !matches!(
                    p.outcome,
                    ProjectOutcome::Failed { .. } | ProjectOutcome::Skipped { .. }
                )
            })
            .count()
    }
}

impl GitHubSyncService {
    pub fn new(
        db: DatabaseConnection,
        api: Arc<dyn SourceHostingApi>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { db, api, clock }
    }

    /// Sync every project, then the user's contributions.
    /// Only database errors abort the run; API failures are logged and skipped.
    pub async fn run(&self, username: &str) -> Result<SyncReport> {
        log::info!("🔄 Starting GitHub sync");

        let projects = content::all_projects(&self.db).await?;
        log::info!("Syncing {} projects...", projects.len());

        let mut seen = HashSet::new();
        let mut reports = Vec::with_capacity(projects.len());
        for project in projects {
            if !seen.insert(project.repo_full_name.clone()) {
                continue;
            }

            let outcome = self.sync_project(&project.repo_full_name).await?;
            reports.push(ProjectReport {
                repo_full_name: project.repo_full_name,
                outcome,
            });
        }

        let contributions = self.sync_contributions(username).await?;

        let report = SyncReport {
            projects: reports,
            contributions,
        };
        log::info!(
            "✅ GitHub sync completed: {}/{} projects synced, {} contribution days for {}",
            report.projects_synced(),
            report.projects.len(),
            report.contributions.days_written,
            report.contributions.username
        );

        Ok(report)
    }

    /// Refresh one repository's snapshot and its 90-day activity window
    pub async fn sync_project(&self, repo_full_name: &str) -> Result<ProjectOutcome> {
        if let Err(e) = validate_repo_full_name(repo_full_name) {
            log::warn!("Skipping project with invalid repository '{}': {}", repo_full_name, e);
            return Ok(ProjectOutcome::Skipped {
                reason: e.to_string(),
            });
        }

        log::info!("  Processing {}...", repo_full_name);

        let payload = match self.api.fetch_repo(repo_full_name).await {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("  Error fetching {}: {}", repo_full_name, e);
                return Ok(ProjectOutcome::Failed {
                    error: e.to_string(),
                });
            }
        };

        let readme = match self.api.fetch_readme(repo_full_name).await {
            Ok(readme) => Some(readme),
            Err(e) => {
                log::debug!("  No README refresh for {}: {}", repo_full_name, e);
                None
            }
        };

        cache_store::upsert_snapshot(
            &self.db,
            snapshot_update(repo_full_name, &payload, readme),
            self.clock.now(),
        )
        .await?;

        let weeks = match self.api.fetch_commit_activity(repo_full_name).await {
            Ok(weeks) => weeks,
            Err(ApiError::Pending) => {
                log::warn!("  Stats calculation in progress for {}", repo_full_name);
                return Ok(ProjectOutcome::ActivityPending);
            }
            Err(e) => {
                log::warn!("  Error fetching commit activity for {}: {}", repo_full_name, e);
                return Ok(ProjectOutcome::ActivityFailed {
                    error: e.to_string(),
                });
            }
        };

        let today = self.clock.today();
        let cutoff = today - Duration::days(ACTIVITY_WINDOW_DAYS);

        let evicted = cache_store::evict_activity_before(&self.db, repo_full_name, cutoff).await?;
        if evicted > 0 {
            log::debug!("🗑️  Evicted {} activity points for {}", evicted, repo_full_name);
        }

        let points = activity_in_window(&weeks, cutoff, today);
        for (day, commits) in &points {
            cache_store::upsert_activity_point(&self.db, repo_full_name, *day, *commits).await?;
        }

        Ok(ProjectOutcome::Synced {
            activity_days: points.len(),
            evicted,
        })
    }

    /// Rebuild the current year's per-day contribution counts from the public events feed
    pub async fn sync_contributions(&self, username: &str) -> Result<ContributionReport> {
        let mut report = ContributionReport {
            username: username.to_string(),
            ..Default::default()
        };

        if let Err(e) = validate_username(username) {
            log::warn!("Skipping contributions for invalid username '{}': {}", username, e);
            report.error = Some(e.to_string());
            return Ok(report);
        }

        log::info!("Syncing contributions for {}...", username);

        let (year_start, year_end) = year_bounds(self.clock.today());
        report.evicted =
            cache_store::evict_contributions_before(&self.db, username, year_start).await?;

        let mut counts: BTreeMap<NaiveDate, i32> = BTreeMap::new();
        for page in 1..=MAX_EVENT_PAGES {
            let events = match self.api.fetch_user_events(username, page, EVENTS_PER_PAGE).await {
                Ok(events) => events,
                Err(e) => {
                    log::warn!("  Error fetching events page {} for {}: {}", page, username, e);
                    report.error = Some(e.to_string());
                    break;
                }
            };
            report.pages_fetched += 1;

            if events.is_empty() {
                break;
            }

            report.events_counted += tally_contributions(&events, year_start, year_end, &mut counts);

            // The feed is newest first, so nothing after a pre-year event can count
            let oldest = events.last().and_then(Event::created_date);
            if oldest.is_some_and(|day| day < year_start) {
                break;
            }
        }

        // Days outside this run's event window keep their cached counts
        for (day, count) in &counts {
            cache_store::upsert_contribution_day(&self.db, username, *day, *count).await?;
        }
        report.days_written = counts.len();

        log::info!(
            "  Synced {} days of contributions ({} pages)",
            report.days_written,
            report.pages_fetched
        );

        Ok(report)
    }
}

fn clamp_count(value: i64) -> i32 {
    value.clamp(0, i32::MAX as i64) as i32
}

fn snapshot_update(
    repo_full_name: &str,
    payload: &RepoPayload,
    readme_content: Option<String>,
) -> SnapshotUpdate {
    SnapshotUpdate {
        repo_full_name: repo_full_name.to_string(),
        description: payload.description.clone().unwrap_or_default(),
        language: payload.language.clone().unwrap_or_default(),
        stars: clamp_count(payload.stargazers_count.unwrap_or(0)),
        forks: clamp_count(payload.forks_count.unwrap_or(0)),
        open_issues: clamp_count(payload.open_issues_count.unwrap_or(0)),
        pushed_at: payload.pushed_at_utc(),
        readme_content,
    }
}

/// Daily commit counts from the last [`ACTIVITY_WEEKS`] buckets that fall in `[cutoff, today]`
fn activity_in_window(
    weeks: &[WeekBucket],
    cutoff: NaiveDate,
    today: NaiveDate,
) -> Vec<(NaiveDate, i32)> {
    let recent = &weeks[weeks.len().saturating_sub(ACTIVITY_WEEKS)..];

    recent
        .iter()
        .filter_map(|bucket| bucket.start_date().map(|start| (start, bucket)))
        .flat_map(|(start, bucket)| {
            bucket
                .days
                .iter()
                .take(7)
                .enumerate()
                .map(move |(offset, commits)| {
                    (start + Duration::days(offset as i64), clamp_count(*commits))
                })
        })
        .filter(|(day, _)| *day >= cutoff && *day <= today)
        .collect()
}

/// Add contribution-bearing events dated within `[start, end]` to `counts`.
/// Returns how many events were counted.
fn tally_contributions(
    events: &[Event],
    start: NaiveDate,
    end: NaiveDate,
    counts: &mut BTreeMap<NaiveDate, i32>,
) -> u32 {
    let mut counted = 0;
    for event in events {
        let Some(day) = event.created_date() else {
            continue;
        };
        if day < start || day > end || !event.is_contribution() {
            continue;
        }

        *counts.entry(day).or_insert(0) += 1;
        counted += 1;
    }
    counted
}

/// January 1st and December 31st of `today`'s year
fn year_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_ordinal(1).unwrap_or(today);
    let end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
    (start, end)
}
