use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "planning")]
    Planning,
}

/// A showcased project. The sync job reads `repo_full_name` but never writes here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    /// `owner/repo` on the source-hosting service
    pub repo_full_name: String,
    pub tagline: String,
    /// Comma-separated tech stack
    pub stack: String,
    pub demo_url: Option<String>,
    pub featured: bool,
    pub status: ProjectStatus,
    pub sort_order: i32,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::devlog_post::Entity")]
    DevlogPosts,
}

impl Related<super::devlog_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DevlogPosts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn stack_list(&self) -> Vec<String> {
        split_comma_list(&self.stack)
    }
}

pub(crate) fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
