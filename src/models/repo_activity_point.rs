use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Commits per day for one repository, kept for a rolling 90-day window.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repo_activity_points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub repo_full_name: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub day: ChronoDate,
    pub commits: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
