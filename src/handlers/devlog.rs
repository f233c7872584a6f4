use actix_web::{web, HttpResponse, Responder};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use super::database_error;
use crate::models::devlog_post;
use crate::services::content;

const RELATED_POSTS_LIMIT: u64 = 3;

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    /// Newest `limit` posts only, e.g. the home page feed
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: devlog_post::Model,
    pub tags_list: Vec<String>,
}

impl From<devlog_post::Model> for PostResponse {
    fn from(post: devlog_post::Model) -> Self {
        Self {
            tags_list: post.tags_list(),
            post,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub related_posts: Vec<PostResponse>,
}

/// GET /devlog
/// Published posts, newest first
pub async fn list_posts(
    db: web::Data<DatabaseConnection>,
    query: web::Query<PostsQuery>,
) -> Result<impl Responder, actix_web::Error> {
    let posts = content::published_posts(db.get_ref(), query.limit)
        .await
        .map_err(database_error)?;

    let posts: Vec<PostResponse> = posts.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /devlog/{slug}
/// A published post with raw markdown, plus related posts from the same project
pub async fn get_post(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<impl Responder, actix_web::Error> {
    let slug = path.into_inner();

    let post = match content::published_post_by_slug(db.get_ref(), &slug)
        .await
        .map_err(database_error)?
    {
        Some(post) if post.is_published() => post,
        _ => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Post not found: {}", slug)
            })));
        }
    };

    let related_posts = content::related_posts(db.get_ref(), &post, RELATED_POSTS_LIMIT)
        .await
        .map_err(database_error)?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post.into(),
        related_posts: related_posts.into_iter().map(Into::into).collect(),
    }))
}
