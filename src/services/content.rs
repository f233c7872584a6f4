use sea_orm::*;

use crate::models::devlog_post::{self, PostStatus};
use crate::models::project::{self, ProjectStatus};

/// Every project regardless of status, in display order
pub async fn all_projects<C: ConnectionTrait>(db: &C) -> Result<Vec<project::Model>, DbErr> {
    project::Entity::find()
        .order_by_asc(project::Column::SortOrder)
        .order_by_asc(project::Column::Title)
        .all(db)
        .await
}

pub async fn active_projects<C: ConnectionTrait>(db: &C) -> Result<Vec<project::Model>, DbErr> {
    project::Entity::find()
        .filter(project::Column::Status.eq(ProjectStatus::Active))
        .order_by_asc(project::Column::SortOrder)
        .order_by_asc(project::Column::Title)
        .all(db)
        .await
}

pub async fn featured_projects<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> Result<Vec<project::Model>, DbErr> {
    project::Entity::find()
        .filter(project::Column::Status.eq(ProjectStatus::Active))
        .filter(project::Column::Featured.eq(true))
        .order_by_asc(project::Column::SortOrder)
        .order_by_asc(project::Column::Title)
        .limit(limit)
        .all(db)
        .await
}

pub async fn active_project_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<Option<project::Model>, DbErr> {
    project::Entity::find()
        .filter(project::Column::Slug.eq(slug))
        .filter(project::Column::Status.eq(ProjectStatus::Active))
        .one(db)
        .await
}

fn published() -> Select<devlog_post::Entity> {
    devlog_post::Entity::find()
        .filter(devlog_post::Column::Status.eq(PostStatus::Published))
        .filter(devlog_post::Column::PublishedAt.is_not_null())
}

/// Published posts, newest first
pub async fn published_posts<C: ConnectionTrait>(
    db: &C,
    limit: Option<u64>,
) -> Result<Vec<devlog_post::Model>, DbErr> {
    published()
        .order_by_desc(devlog_post::Column::PublishedAt)
        .limit(limit)
        .all(db)
        .await
}

pub async fn published_post_by_slug<C: ConnectionTrait>(
    db: &C,
    slug: &str,
) -> Result<Option<devlog_post::Model>, DbErr> {
    published()
        .filter(devlog_post::Column::Slug.eq(slug))
        .one(db)
        .await
}

pub async fn posts_for_project<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    limit: u64,
) -> Result<Vec<devlog_post::Model>, DbErr> {
    published()
        .filter(devlog_post::Column::ProjectId.eq(project_id))
        .order_by_desc(devlog_post::Column::PublishedAt)
        .limit(limit)
        .all(db)
        .await
}

/// Other published posts, restricted to the same project when the post has one
pub async fn related_posts<C: ConnectionTrait>(
    db: &C,
    post: &devlog_post::Model,
    limit: u64,
) -> Result<Vec<devlog_post::Model>, DbErr> {
    let mut query = published().filter(devlog_post::Column::Id.ne(post.id));
    if let Some(project_id) = post.project_id {
        query = query.filter(devlog_post::Column::ProjectId.eq(project_id));
    }

    query
        .order_by_desc(devlog_post::Column::PublishedAt)
        .limit(limit)
        .all(db)
        .await
}
