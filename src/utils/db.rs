use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityName, EntityTrait,
    Schema,
};
use std::time::Duration;

use crate::models::{
    devlog_post, project, repo_activity_point, repo_snapshot, user_contribution_day,
};

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // An in-memory sqlite database exists per connection, so the pool must not grow.
    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1);
    }

    Database::connect(options)
        .await
        .with_context(|| "Failed to connect to database")
}

/// Create every table that does not exist yet.
pub async fn create_schema(db: &DatabaseConnection) -> Result<()> {
    create_table(db, project::Entity).await?;
    create_table(db, devlog_post::Entity).await?;
    create_table(db, repo_snapshot::Entity).await?;
    create_table(db, repo_activity_point::Entity).await?;
    create_table(db, user_contribution_day::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement))
        .await
        .with_context(|| format!("Failed to create table {}", entity.table_name()))?;

    log::debug!("Ensured table {}", entity.table_name());
    Ok(())
}

/// Fresh in-memory database with the full schema, for tests.
#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    let db = establish_connection("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    create_schema(&db).await.expect("schema");
    db
}
