use actix_web::{web, HttpResponse, Responder};
use chrono::Duration;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use super::database_error;
use crate::models::{devlog_post, project, repo_snapshot};
use crate::services::cache_store;
use crate::services::clock::Clock;
use crate::services::content;
use crate::services::dashboard::{activity_chart, ActivityChart};
use crate::services::github_sync::ACTIVITY_WINDOW_DAYS;

const FEATURED_LIMIT: u64 = 6;
const RELATED_POSTS_LIMIT: u64 = 5;

#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    pub featured: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: project::Model,
    pub stack_list: Vec<String>,
}

impl From<project::Model> for ProjectSummary {
    fn from(project: project::Model) -> Self {
        Self {
            stack_list: project.stack_list(),
            project,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub project: ProjectSummary,
    pub snapshot: Option<repo_snapshot::Model>,
    pub activity: ActivityChart,
    pub related_posts: Vec<devlog_post::Model>,
}

/// GET /projects
/// Active projects in display order, or only the featured ones with `?featured=true`
pub async fn list_projects(
    db: web::Data<DatabaseConnection>,
    query: web::Query<ProjectsQuery>,
) -> Result<impl Responder, actix_web::Error> {
    let projects = if query.featured.unwrap_or(false) {
        content::featured_projects(db.get_ref(), FEATURED_LIMIT).await
    } else {
        content::active_projects(db.get_ref()).await
    }
    .map_err(database_error)?;

    let summaries: Vec<ProjectSummary> = projects.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/// GET /projects/{slug}
/// Project with its cached snapshot and the last 90 days of commit activity
pub async fn get_project(
    db: web::Data<DatabaseConnection>,
    clock: web::Data<dyn Clock>,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    let slug = path.into_inner();

    let Some(project) = content::active_project_by_slug(db.get_ref(), &slug)
        .await
        .map_err(database_error)?
    else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Project not found: {}", slug)
        })));
    };

    let snapshot = cache_store::snapshot_for(db.get_ref(), &project.repo_full_name)
        .await
        .map_err(database_error)?;

    let today = clock.today();
    let points = cache_store::activity_points(
        db.get_ref(),
        &project.repo_full_name,
        today - Duration::days(ACTIVITY_WINDOW_DAYS),
        today,
    )
    .await
    .map_err(database_error)?;

    let related_posts = content::posts_for_project(db.get_ref(), project.id, RELATED_POSTS_LIMIT)
        .await
        .map_err(database_error)?;

    Ok(HttpResponse::Ok().json(ProjectDetailResponse {
        project: project.into(),
        snapshot,
        activity: activity_chart(&points),
        related_posts,
    }))
}
