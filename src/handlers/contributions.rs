use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::database_error;
use crate::services::cache_store;
use crate::services::clock::Clock;
use crate::services::dashboard::year_heatmap;
use crate::utils::config::Config;
use crate::utils::validators::validate_username;

#[derive(Debug, Deserialize)]
pub struct ContributionsQuery {
    pub username: Option<String>,
}

/// GET /contributions
/// Current-year contribution heatmap for `username` (defaults to the configured user)
pub async fn get_contributions(
    db: web::Data<DatabaseConnection>,
    config: web::Data<Config>,
    clock: web::Data<dyn Clock>,
    query: web::Query<ContributionsQuery>,
) -> Result<impl Responder, actix_web::Error> {
    let username = query
        .username
        .clone()
        .unwrap_or_else(|| config.github_username.clone());

    if let Err(e) = validate_username(&username) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string()
        })));
    }

    let year = clock.today().year();
    let (Some(year_start), Some(year_end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Err(actix_web::error::ErrorInternalServerError("Invalid year"));
    };

    let days = cache_store::contribution_days(db.get_ref(), &username, year_start, year_end)
        .await
        .map_err(database_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "username": username,
        "heatmap": year_heatmap(year, &days),
    })))
}
