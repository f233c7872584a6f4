pub mod contributions;
pub mod devlog;
pub mod projects;

use actix_web::web;

/// Register the public read-only routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::list_projects))
            .route("/{slug}", web::get().to(projects::get_project)),
    )
    .service(
        web::scope("/contributions")
            .route("", web::get().to(contributions::get_contributions)),
    )
    .service(
        web::scope("/devlog")
            .route("", web::get().to(devlog::list_posts))
            .route("/{slug}", web::get().to(devlog::get_post)),
    );
}

fn database_error(e: sea_orm::DbErr) -> actix_web::Error {
    log::error!("Database error: {}", e);
    actix_web::error::ErrorInternalServerError("Database error")
}
