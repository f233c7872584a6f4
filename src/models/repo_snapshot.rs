use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Last known repository metadata, one row per repository.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repo_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub repo_full_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub language: String,
    pub stars: i32,
    pub forks: i32,
    pub open_issues: i32,
    pub pushed_at: Option<ChronoDateTimeUtc>,
    #[sea_orm(column_type = "Text")]
    pub readme_content: String,
    /// Set on first insert only
    pub fetched_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
