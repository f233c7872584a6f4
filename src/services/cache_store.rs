//! Reads and writes for the three cache tables filled by the sync job.
//!
//! Writes are keyed upserts on each table's primary key, so re-applying the
//! same data leaves the table unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::models::{repo_activity_point, repo_snapshot, user_contribution_day};

/// Fields written to a [`repo_snapshot`] row on every successful metadata fetch
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotUpdate {
    pub repo_full_name: String,
    pub description: String,
    pub language: String,
    pub stars: i32,
    pub forks: i32,
    pub open_issues: i32,
    pub pushed_at: Option<DateTime<Utc>>,
    /// `None` keeps whatever README is already cached
    pub readme_content: Option<String>,
}

pub async fn upsert_snapshot<C: ConnectionTrait>(
    db: &C,
    update: SnapshotUpdate,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    let mut update_columns = vec![
        repo_snapshot::Column::Description,
        repo_snapshot::Column::Language,
        repo_snapshot::Column::Stars,
        repo_snapshot::Column::Forks,
        repo_snapshot::Column::OpenIssues,
        repo_snapshot::Column::PushedAt,
        repo_snapshot::Column::UpdatedAt,
    ];
    if update.readme_content.is_some() {
        update_columns.push(repo_snapshot::Column::ReadmeContent);
    }

    let row = repo_snapshot::ActiveModel {
        repo_full_name: Set(update.repo_full_name),
        description: Set(update.description),
        language: Set(update.language),
        stars: Set(update.stars),
        forks: Set(update.forks),
        open_issues: Set(update.open_issues),
        pushed_at: Set(update.pushed_at),
        readme_content: Set(update.readme_content.unwrap_or_default()),
        fetched_at: Set(now),
        updated_at: Set(now),
    };

    repo_snapshot::Entity::insert(row)
        .on_conflict(
            OnConflict::column(repo_snapshot::Column::RepoFullName)
                .update_columns(update_columns)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Delete a repository's activity points dated before `cutoff`
pub async fn evict_activity_before<C: ConnectionTrait>(
    db: &C,
    repo_full_name: &str,
    cutoff: NaiveDate,
) -> Result<u64, DbErr> {
    let deleted = repo_activity_point::Entity::delete_many()
        .filter(repo_activity_point::Column::RepoFullName.eq(repo_full_name))
        .filter(repo_activity_point::Column::Day.lt(cutoff))
        .exec(db)
        .await?;

    Ok(deleted.rows_affected)
}

pub async fn upsert_activity_point<C: ConnectionTrait>(
    db: &C,
    repo_full_name: &str,
    day: NaiveDate,
    commits: i32,
) -> Result<(), DbErr> {
    let row = repo_activity_point::ActiveModel {
        repo_full_name: Set(repo_full_name.to_owned()),
        day: Set(day),
        commits: Set(commits),
    };

    repo_activity_point::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                repo_activity_point::Column::RepoFullName,
                repo_activity_point::Column::Day,
            ])
            .update_column(repo_activity_point::Column::Commits)
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Delete a user's contribution days dated before `start`
pub async fn evict_contributions_before<C: ConnectionTrait>(
    db: &C,
    username: &str,
    start: NaiveDate,
) -> Result<u64, DbErr> {
    let deleted = user_contribution_day::Entity::delete_many()
        .filter(user_contribution_day::Column::Username.eq(username))
        .filter(user_contribution_day::Column::Day.lt(start))
        .exec(db)
        .await?;

    Ok(deleted.rows_affected)
}

pub async fn upsert_contribution_day<C: ConnectionTrait>(
    db: &C,
    username: &str,
    day: NaiveDate,
    count: i32,
) -> Result<(), DbErr> {
    let row = user_contribution_day::ActiveModel {
        username: Set(username.to_owned()),
        day: Set(day),
        count: Set(count),
    };

    user_contribution_day::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([
                user_contribution_day::Column::Username,
                user_contribution_day::Column::Day,
            ])
            .update_column(user_contribution_day::Column::Count)
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

pub async fn snapshot_for<C: ConnectionTrait>(
    db: &C,
    repo_full_name: &str,
) -> Result<Option<repo_snapshot::Model>, DbErr> {
    repo_snapshot::Entity::find_by_id(repo_full_name.to_owned())
        .one(db)
        .await
}

/// Activity points in `[from, to]`, oldest first
pub async fn activity_points<C: ConnectionTrait>(
    db: &C,
    repo_full_name: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<repo_activity_point::Model>, DbErr> {
    repo_activity_point::Entity::find()
        .filter(repo_activity_point::Column::RepoFullName.eq(repo_full_name))
        .filter(repo_activity_point::Column::Day.between(from, to))
        .order_by_asc(repo_activity_point::Column::Day)
        .all(db)
        .await
}

/// Contribution days in `[from, to]`, oldest first
pub async fn contribution_days<C: ConnectionTrait>(
    db: &C,
    username: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<user_contribution_day::Model>, DbErr> {
    user_contribution_day::Entity::find()
        .filter(user_contribution_day::Column::Username.eq(username))
        .filter(user_contribution_day::Column::Day.between(from, to))
        .order_by_asc(user_contribution_day::Column::Day)
        .all(db)
        .await
}
